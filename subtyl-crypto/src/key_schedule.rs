//! Derives the three session keys from the ECDH shared secret and the
//! peers' combined nonces, with full domain separation between labels.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::hkdf;
use crate::primitives::SharedSecret;

const INFO_VERSION: u8 = 1;
const LABEL_ENCRYPTION: &str = "SubtylSocket-Encryption";
const LABEL_AUTHENTICATION: &str = "SubtylSocket-Authentication";
const LABEL_CONFIRMATION: &str = "SubtylSocket-KeyConfirmation";

/// `[len(label)] || utf8(label) || [version]`. The length prefix and
/// version octet are byte-exact wire contract, not decoration — changing
/// either breaks interop with any peer using this schedule.
fn info(label: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + label.len() + 1);
    out.push(label.len() as u8);
    out.extend_from_slice(label.as_bytes());
    out.push(INFO_VERSION);
    out
}

/// A single 32-byte derived key, zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey([u8; 32]);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl core::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// The three keys produced by one key-schedule run. Constructed only as a
/// complete set — there is no way to obtain one of the three without the
/// other two, matching the "all three succeed or none" invariant.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKeys {
    pub encryption: DerivedKey,
    pub authentication: DerivedKey,
    /// Never exposed outside the handshake component.
    pub confirmation: DerivedKey,
}

/// Derive `encryption`, `authentication`, and `confirmation` keys from the
/// ECDH shared secret and both peers' nonces.
///
/// `salt = initiator_nonce || responder_nonce`; three domain-separated
/// `HKDF-Expand` calls share one `HKDF-Extract`.
pub fn derive_keys(
    shared_secret: &SharedSecret,
    initiator_nonce: &[u8; 32],
    responder_nonce: &[u8; 32],
) -> Result<DerivedKeys, CryptoError> {
    let mut salt = [0u8; 64];
    salt[..32].copy_from_slice(initiator_nonce);
    salt[32..].copy_from_slice(responder_nonce);

    let prk = hkdf::extract(&salt, shared_secret.as_bytes());
    salt.zeroize();

    let encryption = expand_key(&prk, LABEL_ENCRYPTION)?;
    let authentication = expand_key(&prk, LABEL_AUTHENTICATION)?;
    let confirmation = expand_key(&prk, LABEL_CONFIRMATION)?;

    Ok(DerivedKeys {
        encryption,
        authentication,
        confirmation,
    })
}

fn expand_key(prk: &[u8; 32], label: &str) -> Result<DerivedKey, CryptoError> {
    let bytes = hkdf::expand(prk, &info(label), 32)?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    Ok(DerivedKey(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::SharedSecret;

    fn secret(byte: u8) -> SharedSecret {
        SharedSecret::from_bytes([byte; 32])
    }

    #[test]
    fn the_three_keys_are_pairwise_distinct() {
        let keys = derive_keys(&secret(1), &[2u8; 32], &[3u8; 32]).unwrap();
        assert_ne!(keys.encryption.as_bytes(), keys.authentication.as_bytes());
        assert_ne!(keys.encryption.as_bytes(), keys.confirmation.as_bytes());
        assert_ne!(
            keys.authentication.as_bytes(),
            keys.confirmation.as_bytes()
        );
    }

    #[test]
    fn same_inputs_are_deterministic() {
        let a = derive_keys(&secret(5), &[1u8; 32], &[2u8; 32]).unwrap();
        let b = derive_keys(&secret(5), &[1u8; 32], &[2u8; 32]).unwrap();
        assert_eq!(a.encryption.as_bytes(), b.encryption.as_bytes());
        assert_eq!(a.authentication.as_bytes(), b.authentication.as_bytes());
    }

    #[test]
    fn flipping_a_nonce_bit_changes_every_key() {
        let base = derive_keys(&secret(7), &[0u8; 32], &[0u8; 32]).unwrap();
        let mut flipped_nonce = [0u8; 32];
        flipped_nonce[0] = 0x01;
        let flipped = derive_keys(&secret(7), &flipped_nonce, &[0u8; 32]).unwrap();
        assert_ne!(base.encryption.as_bytes(), flipped.encryption.as_bytes());
        assert_ne!(
            base.authentication.as_bytes(),
            flipped.authentication.as_bytes()
        );
        assert_ne!(
            base.confirmation.as_bytes(),
            flipped.confirmation.as_bytes()
        );
    }

    #[test]
    fn info_label_is_length_prefixed_and_versioned() {
        let encoded = info(LABEL_ENCRYPTION);
        assert_eq!(encoded[0] as usize, LABEL_ENCRYPTION.len());
        assert_eq!(&encoded[1..encoded.len() - 1], LABEL_ENCRYPTION.as_bytes());
        assert_eq!(*encoded.last().unwrap(), INFO_VERSION);
    }
}
