//! The discriminated result every handshake call returns: at most one
//! outbound message, plus whatever the call did to the peer's status.

use crate::error::ErrorKind;
use crate::wire::WireMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStatus {
    InProgress,
    Confirmed,
    Failed,
}

/// Returned by every `start()`/`handle()` call. `outbound` is `Some` exactly
/// when this call produced a message the owner must hand to the transport
/// before dispatching anything else to this peer.
#[derive(Debug, Clone)]
pub struct HandshakeEvent {
    pub outbound: Option<WireMessage>,
    pub status: HandshakeStatus,
    pub error: Option<ErrorKind>,
}

impl HandshakeEvent {
    pub(crate) fn in_progress(outbound: WireMessage) -> Self {
        Self {
            outbound: Some(outbound),
            status: HandshakeStatus::InProgress,
            error: None,
        }
    }

    pub(crate) fn confirmed(outbound: Option<WireMessage>) -> Self {
        Self {
            outbound,
            status: HandshakeStatus::Confirmed,
            error: None,
        }
    }

    pub(crate) fn failed(error: ErrorKind) -> Self {
        Self {
            outbound: None,
            status: HandshakeStatus::Failed,
            error: Some(error),
        }
    }
}
