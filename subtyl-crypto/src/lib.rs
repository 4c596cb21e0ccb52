//! Cryptographic primitives, HKDF, and the key schedule for the
//! SubtylSocket handshake. Everything in `subtyl-core` that needs ECDH,
//! HMAC, AES-GCM, or key derivation goes through this crate.

pub mod error;
pub mod hkdf;
pub mod key_schedule;
pub mod primitives;
pub mod types;

pub use error::CryptoError;
pub use key_schedule::{derive_keys, DerivedKey, DerivedKeys};
pub use p256::PublicKey;
pub use primitives::{
    aead_decrypt, aead_encrypt, constant_time_eq, parse_public_key, random_array,
    EphemeralKeyPair, SharedSecret, AEAD_IV_LEN, AEAD_TAG_LEN, HMAC_TAG_LEN, NONCE_LEN,
    SESSION_ID_LEN,
};
pub use types::{Nonce, SessionId};
