//! The stable error taxonomy surfaced to a peer's owner. Every variant
//! drives the handshake to `Failed`; none is retried at this layer.

use thiserror::Error;

/// One of the ten named failure kinds. Kept flat and `Copy` so a caller can
/// match on it without borrowing into the error that produced it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("message was not valid JSON or was missing a required field")]
    MalformedMessage,
    #[error("message type did not match what this state expects next")]
    UnexpectedMessage,
    #[error("protocol version is not supported")]
    UnsupportedVersion,
    #[error("no common cipher or hash algorithm")]
    UnsupportedAlgorithm,
    #[error("session id does not match the session established at handshake start")]
    SessionIdMismatch,
    #[error("peer's public key was rejected")]
    InvalidPublicKey,
    #[error("key confirmation MAC did not match")]
    KeyConfirmationFailed,
    #[error("HKDF expand length exceeds 255 * hash length")]
    LengthTooLarge,
    #[error("CSPRNG produced a degenerate buffer")]
    InsufficientEntropy,
    #[error("AEAD authentication tag mismatch")]
    AeadTagMismatch,
    /// The peer has already reached `Failed` or been destroyed; every
    /// operation on it now returns this instead of doing anything.
    #[error("peer is destroyed or the handshake has already failed")]
    Terminal,
}

impl From<subtyl_crypto::CryptoError> for ErrorKind {
    fn from(err: subtyl_crypto::CryptoError) -> Self {
        match err {
            subtyl_crypto::CryptoError::InsufficientEntropy => ErrorKind::InsufficientEntropy,
            subtyl_crypto::CryptoError::InvalidPublicKey => ErrorKind::InvalidPublicKey,
            subtyl_crypto::CryptoError::AeadTagMismatch => ErrorKind::AeadTagMismatch,
            subtyl_crypto::CryptoError::LengthTooLarge => ErrorKind::LengthTooLarge,
        }
    }
}
