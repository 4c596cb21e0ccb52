use thiserror::Error;

/// Stable error taxonomy for everything below the handshake state machine.
///
/// Variants mirror the ones the handshake layer surfaces by name; this type
/// only ever carries the kind, never key material or transcript bytes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    #[error("CSPRNG produced a degenerate buffer")]
    InsufficientEntropy,
    #[error("peer public key rejected by ECDH")]
    InvalidPublicKey,
    #[error("AEAD authentication tag mismatch")]
    AeadTagMismatch,
    #[error("HKDF expand length exceeds 255 * hash length")]
    LengthTooLarge,
}
