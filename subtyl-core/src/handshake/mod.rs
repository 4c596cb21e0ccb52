mod event;
mod initiator;
mod responder;
mod transcript;

pub use event::{HandshakeEvent, HandshakeStatus};
pub use initiator::{Initiator, SessionKeys};
pub use responder::Responder;
