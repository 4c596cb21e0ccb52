//! ECDH on P-256, HMAC-SHA-256, AES-256-GCM, the CSPRNG sanity check, and
//! constant-time equality. Everything `subtyl-crypto` exports above this
//! module is built out of these primitives.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key as AesKey, Nonce as AesNonce};
use elliptic_curve::sec1::ToEncodedPoint;
use hmac::{Hmac, Mac};
use p256::ecdh::EphemeralSecret;
use p256::PublicKey;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

pub const NONCE_LEN: usize = 32;
pub const SESSION_ID_LEN: usize = 16;
pub const HMAC_TAG_LEN: usize = 32;
pub const AEAD_IV_LEN: usize = 12;
pub const AEAD_TAG_LEN: usize = 16;

/// Draw `N` bytes from the OS CSPRNG, rejecting a catastrophically broken
/// source outright: an all-zero or all-0xFF buffer. This is a cheap sanity
/// check, not a statistical test — it exists to catch a stuck or
/// misconfigured RNG, not to validate randomness quality.
pub fn random_array<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    if buf.iter().all(|&b| b == 0x00) || buf.iter().all(|&b| b == 0xFF) {
        return Err(CryptoError::InsufficientEntropy);
    }
    Ok(buf)
}

/// Constant-time equality: lengths are compared first (a length mismatch is
/// allowed to leak), then every byte is folded into a running XOR
/// accumulator with no early return, so comparison time does not depend on
/// the position of the first differing byte.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// HMAC-SHA-256 over an arbitrary number of message chunks, tag length 32.
pub fn hmac_sha256(key: &[u8], chunks: &[&[u8]]) -> [u8; HMAC_TAG_LEN] {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
    for chunk in chunks {
        mac.update(chunk);
    }
    mac.finalize().into_bytes().into()
}

/// 32-byte X-coordinate shared secret from ECDH. Zeroized on drop; never
/// outlives the key schedule call that consumes it.
#[derive(ZeroizeOnDrop)]
pub struct SharedSecret(pub(crate) [u8; 32]);

impl SharedSecret {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// A fresh P-256 key pair generated for one handshake. The private half
/// never leaves this type; the public half is exposed only in the
/// library-standard uncompressed SEC1 form used on the wire.
pub struct EphemeralKeyPair {
    secret: EphemeralSecret,
    public: PublicKey,
}

impl EphemeralKeyPair {
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random(&mut OsRng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Uncompressed SEC1 encoding of the public half, as placed on the wire.
    pub fn public_key_sec1(&self) -> Vec<u8> {
        self.public.to_encoded_point(false).as_bytes().to_vec()
    }

    /// ECDH with a peer's public key, rejecting the identity point by
    /// delegating to the underlying curve implementation's point decoding.
    pub fn diffie_hellman(&self, peer: &PublicKey) -> SharedSecret {
        let shared = self.secret.diffie_hellman(peer);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(shared.raw_secret_bytes().as_slice());
        SharedSecret(bytes)
    }
}

// `EphemeralSecret` zeroizes its scalar on drop; no explicit Drop needed here.

/// Parse a peer's public key from the wire's uncompressed SEC1 bytes,
/// rejecting malformed encodings and the identity point.
pub fn parse_public_key(sec1_bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    PublicKey::from_sec1_bytes(sec1_bytes).map_err(|_| CryptoError::InvalidPublicKey)
}

/// AES-256-GCM encrypt with a caller-supplied 12-byte IV, returning
/// ciphertext with the 16-byte tag appended (the `aes-gcm` crate's default
/// combined output).
pub fn aead_encrypt(
    key: &[u8; 32],
    iv: &[u8; AEAD_IV_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Vec<u8> {
    let cipher = Aes256Gcm::new(AesKey::<Aes256Gcm>::from_slice(key));
    cipher
        .encrypt(
            AesNonce::from_slice(iv),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .expect("AES-256-GCM encryption does not fail for well-formed input")
}

/// AES-256-GCM decrypt; any alteration of ciphertext, IV, tag, or AAD
/// surfaces as `AeadTagMismatch`.
pub fn aead_decrypt(
    key: &[u8; 32],
    iv: &[u8; AEAD_IV_LEN],
    aad: &[u8],
    ciphertext_and_tag: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(AesKey::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(
            AesNonce::from_slice(iv),
            Payload {
                msg: ciphertext_and_tag,
                aad,
            },
        )
        .map_err(|_| CryptoError::AeadTagMismatch)
}
