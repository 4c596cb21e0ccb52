//! The handshake state machine and the post-handshake AEAD channel. Wire
//! messages, the algorithm configuration, and the ten-kind error taxonomy
//! all live here; the primitives underneath come from `subtyl-crypto`.

pub mod algorithms;
pub mod channel;
pub mod config;
pub mod error;
pub mod handshake;
pub mod wire;

pub use algorithms::{CipherSuite, HashSuite};
pub use channel::{Aes256GcmChannelImpl, AeadAlgorithm, AeadChannel};
pub use config::HandshakeConfig;
pub use error::ErrorKind;
pub use handshake::{HandshakeEvent, HandshakeStatus, Initiator, Responder, SessionKeys};
pub use wire::WireMessage;
