//! Copy-free newtypes for the two values every handshake message carries:
//! the session identifier and each peer's nonce. Distinct types make a
//! session-id/nonce transposition a compile error instead of a runtime one.

use zeroize::ZeroizeOnDrop;

use crate::error::CryptoError;
use crate::primitives::{random_array, NONCE_LEN, SESSION_ID_LEN};

/// A 16-byte random token generated once by the Initiator, bound into every
/// message after creation. Not secret — it travels on the wire in the
/// clear — so unlike `Nonce` it is not zeroized.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionId([u8; SESSION_ID_LEN]);

impl SessionId {
    pub fn generate() -> Result<Self, CryptoError> {
        Ok(Self(random_array::<SESSION_ID_LEN>()?))
    }

    pub fn from_bytes(bytes: [u8; SESSION_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a `SessionId` from a wire-supplied slice, failing if it is
    /// not exactly `SESSION_ID_LEN` bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; SESSION_ID_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; SESSION_ID_LEN] {
        &self.0
    }
}

impl core::fmt::Debug for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SessionId({:02x?})", self.0)
    }
}

/// A 32-byte cryptographically random value generated once per peer per
/// handshake and never reused. Zeroized on drop, the same as any other
/// secret handshake input — holding one in a state enum variant is exactly
/// as safe as holding a `DerivedKey`.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    pub fn generate() -> Result<Self, CryptoError> {
        Ok(Self(random_array::<NONCE_LEN>()?))
    }

    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; NONCE_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

impl core::fmt::Debug for Nonce {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Nonce(..)")
    }
}
