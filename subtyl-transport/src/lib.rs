//! Plumbing, not design weight: an untrusted byte-oriented duplex that
//! carries wire JSON between two peer instances. The ordering guarantee the
//! handshake relies on — an outbound message is transmitted before the next
//! inbound one is dispatched — is this crate's job, not the state machine's.

use std::sync::mpsc::{self, Receiver, Sender};

use subtyl_core::WireMessage;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("peer's end of the transport has closed")]
    PeerClosed,
    #[error("received bytes did not parse as a wire message")]
    Malformed,
}

/// Send outbound messages and poll for inbound ones. `try_recv` never
/// blocks; a caller bounding how long a handshake may stay pre-`Confirmed`
/// is expected to poll this on its own schedule.
pub trait Transport {
    fn send(&mut self, message: &WireMessage) -> Result<(), TransportError>;
    fn try_recv(&mut self) -> Result<Option<WireMessage>, TransportError>;
}

/// An in-process duplex built on two `std::sync::mpsc` channels, one per
/// direction. Good for tests and the demo CLI; a real deployment would
/// implement `Transport` over TCP or a plugin host's own IPC instead.
pub struct ChannelTransport {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

impl ChannelTransport {
    /// Build a connected pair: whatever the first peer sends, the second
    /// receives, and vice versa.
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_b) = mpsc::channel();
        let (tx_b, rx_a) = mpsc::channel();
        (
            ChannelTransport { tx: tx_a, rx: rx_a },
            ChannelTransport { tx: tx_b, rx: rx_b },
        )
    }

    /// Blocks until a message arrives or the peer closes. Convenient for a
    /// demo's synchronous run loop; the handshake component itself never
    /// calls this.
    pub fn recv(&self) -> Result<WireMessage, TransportError> {
        let bytes = self.rx.recv().map_err(|_| TransportError::PeerClosed)?;
        WireMessage::from_json(&bytes).ok_or(TransportError::Malformed)
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, message: &WireMessage) -> Result<(), TransportError> {
        trace!("sending wire message");
        self.tx
            .send(message.to_json())
            .map_err(|_| TransportError::PeerClosed)
    }

    fn try_recv(&mut self) -> Result<Option<WireMessage>, TransportError> {
        match self.rx.try_recv() {
            Ok(bytes) => WireMessage::from_json(&bytes)
                .map(Some)
                .ok_or(TransportError::Malformed),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(TransportError::PeerClosed),
        }
    }
}
