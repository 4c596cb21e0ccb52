//! The Initiator (provider) half of the handshake: generates the session
//! id and its own key material, sends first, and is the side that learns
//! of a MAC failure by receiving a bad `KEY_CONFIRMATION`.

use tracing::{debug, warn};

use subtyl_crypto::key_schedule::{derive_keys, DerivedKeys};
use subtyl_crypto::primitives::{constant_time_eq, parse_public_key};
use subtyl_crypto::{EphemeralKeyPair, Nonce, SessionId};

use crate::config::HandshakeConfig;
use crate::error::ErrorKind;
use crate::handshake::event::HandshakeEvent;
use crate::handshake::transcript::confirmation_mac;
use crate::wire::{
    HandshakeInit, HandshakeResponse, KeyConfirmation, KeyConfirmationRequest, WireMessage,
    PROTOCOL_VERSION,
};

/// One payload shape per state — there is no representable state where
/// `state == Confirmed` but `keys` is absent, because `Confirmed` is the
/// only variant that carries a `DerivedKeys`. Nonces are `Nonce`, not
/// `[u8; 32]`, so they zeroize when a state is replaced or the peer is
/// dropped.
enum State {
    Fresh,
    AwaitingResponse {
        keypair: EphemeralKeyPair,
        own_nonce: Nonce,
    },
    AwaitingConfirmation {
        own_nonce: Nonce,
        own_public: Vec<u8>,
        peer_nonce: Nonce,
        peer_public: Vec<u8>,
        keys: DerivedKeys,
    },
    Confirmed {
        keys: DerivedKeys,
    },
    Failed {
        error: ErrorKind,
    },
}

/// A public+authentication key pair handed back by `derived_keys()`. The
/// confirmation key never leaves the handshake component.
pub struct SessionKeys {
    pub encryption: [u8; 32],
    pub authentication: [u8; 32],
}

pub struct Initiator {
    config: HandshakeConfig,
    session_id: SessionId,
    state: State,
}

impl Initiator {
    pub fn new(config: HandshakeConfig) -> Result<Self, ErrorKind> {
        let session_id = SessionId::generate()?;
        Ok(Self {
            config,
            session_id,
            state: State::Fresh,
        })
    }

    pub fn session_id(&self) -> String {
        base64_session_id(self.session_id.as_bytes())
    }

    pub fn confirmed(&self) -> bool {
        matches!(self.state, State::Confirmed { .. })
    }

    pub fn derived_keys(&self) -> Option<SessionKeys> {
        match &self.state {
            State::Confirmed { keys } => Some(SessionKeys {
                encryption: *keys.encryption.as_bytes(),
                authentication: *keys.authentication.as_bytes(),
            }),
            _ => None,
        }
    }

    /// Build and "send" (return as `outbound`) `HANDSHAKE_INIT`. Valid only
    /// from `Fresh`; calling it twice on the same peer is a caller bug, not
    /// a protocol one, so it simply re-fails from `Failed` like any other
    /// out-of-order call.
    pub fn start(&mut self) -> HandshakeEvent {
        if !matches!(self.state, State::Fresh) {
            return self.fail(ErrorKind::UnexpectedMessage);
        }

        let keypair = EphemeralKeyPair::generate();
        let own_nonce = match Nonce::generate() {
            Ok(n) => n,
            Err(e) => return self.fail(e.into()),
        };

        let init = HandshakeInit {
            version: PROTOCOL_VERSION,
            session_id: self.session_id.as_bytes().to_vec(),
            public_key: keypair.public_key_sec1(),
            provider_nonce: own_nonce.as_bytes().to_vec(),
            supported_ciphers: self.config.supported_ciphers.clone(),
            supported_hashes: self.config.supported_hashes.clone(),
        };

        debug!(session_id = %self.session_id(), "initiator sending handshake-init");
        self.state = State::AwaitingResponse { keypair, own_nonce };
        HandshakeEvent::in_progress(WireMessage::HandshakeInit(init))
    }

    /// Dispatch an inbound message against the current state. Any message
    /// type the current state doesn't expect fails with `UnexpectedMessage`
    /// and moves to `Failed`, per the state-machine rules.
    pub fn handle(&mut self, message: &WireMessage) -> HandshakeEvent {
        match (&self.state, message) {
            (State::AwaitingResponse { .. }, WireMessage::HandshakeResponse(resp)) => {
                self.handle_response(resp.clone())
            }
            (State::AwaitingConfirmation { .. }, WireMessage::KeyConfirmation(conf)) => {
                self.handle_confirmation(conf.clone())
            }
            (State::Failed { error }, _) => self.terminal_event(*error),
            (State::Confirmed { .. }, _) => {
                // Post-handshake messages are a transport/channel concern;
                // ignored at this layer per the concurrency model.
                HandshakeEvent::confirmed(None)
            }
            _ => self.fail(ErrorKind::UnexpectedMessage),
        }
    }

    fn handle_response(&mut self, resp: HandshakeResponse) -> HandshakeEvent {
        let (keypair, own_nonce) = match std::mem::replace(&mut self.state, State::Fresh) {
            State::AwaitingResponse { keypair, own_nonce } => (keypair, own_nonce),
            other => {
                self.state = other;
                return self.fail(ErrorKind::UnexpectedMessage);
            }
        };

        if resp.session_id.as_slice() != self.session_id.as_bytes().as_slice() {
            return self.fail(ErrorKind::SessionIdMismatch);
        }

        let peer_public = match parse_public_key(&resp.public_key) {
            Ok(k) => k,
            Err(e) => return self.fail(e.into()),
        };
        let peer_nonce = match Nonce::from_slice(&resp.consumer_nonce) {
            Some(n) => n,
            None => return self.fail(ErrorKind::MalformedMessage),
        };

        let shared = keypair.diffie_hellman(&peer_public);
        let keys = match derive_keys(&shared, own_nonce.as_bytes(), peer_nonce.as_bytes()) {
            Ok(k) => k,
            Err(e) => return self.fail(e.into()),
        };

        let own_public = keypair.public_key_sec1();
        let peer_public_sec1 = resp.public_key.clone();
        let mac_i = confirmation_mac(
            &keys,
            own_nonce.as_bytes(),
            peer_nonce.as_bytes(),
            &own_public,
            &peer_public_sec1,
        );

        let request = KeyConfirmationRequest {
            confirmation_mac: mac_i.to_vec(),
        };

        self.state = State::AwaitingConfirmation {
            own_nonce,
            own_public,
            peer_nonce,
            peer_public: peer_public_sec1,
            keys,
        };
        HandshakeEvent::in_progress(WireMessage::KeyConfirmationRequest(request))
    }

    fn handle_confirmation(&mut self, conf: KeyConfirmation) -> HandshakeEvent {
        let (own_nonce, own_public, peer_nonce, peer_public, keys) =
            match std::mem::replace(&mut self.state, State::Fresh) {
                State::AwaitingConfirmation {
                    own_nonce,
                    own_public,
                    peer_nonce,
                    peer_public,
                    keys,
                } => (own_nonce, own_public, peer_nonce, peer_public, keys),
                other => {
                    self.state = other;
                    return self.fail(ErrorKind::UnexpectedMessage);
                }
            };

        if conf.session_id.as_slice() != self.session_id.as_bytes().as_slice() {
            self.state = State::Failed {
                error: ErrorKind::SessionIdMismatch,
            };
            return HandshakeEvent::failed(ErrorKind::SessionIdMismatch);
        }

        // The Responder echoes its own public key here though the
        // Initiator already has it from `HANDSHAKE_RESPONSE`; any mismatch
        // is treated with `SessionIdMismatch` severity.
        if !constant_time_eq(&conf.public_key, &peer_public) {
            self.state = State::Failed {
                error: ErrorKind::SessionIdMismatch,
            };
            return HandshakeEvent::failed(ErrorKind::SessionIdMismatch);
        }

        let expected_mac_r = confirmation_mac(
            &keys,
            peer_nonce.as_bytes(),
            own_nonce.as_bytes(),
            &peer_public,
            &own_public,
        );
        if !constant_time_eq(&conf.confirmation_mac, &expected_mac_r) {
            warn!(session_id = %self.session_id(), "initiator rejected confirmation mac");
            self.state = State::Failed {
                error: ErrorKind::KeyConfirmationFailed,
            };
            return HandshakeEvent::failed(ErrorKind::KeyConfirmationFailed);
        }

        debug!(session_id = %self.session_id(), "initiator confirmed");
        self.state = State::Confirmed { keys };
        HandshakeEvent::confirmed(None)
    }

    fn fail(&mut self, error: ErrorKind) -> HandshakeEvent {
        self.state = State::Failed { error };
        HandshakeEvent::failed(error)
    }

    fn terminal_event(&self, error: ErrorKind) -> HandshakeEvent {
        HandshakeEvent::failed(error)
    }

    /// Zeroizes key material and marks the peer terminal. Idempotent:
    /// calling it on an already-`Failed` peer does nothing further.
    pub fn destroy(&mut self) {
        self.state = State::Failed {
            error: ErrorKind::Terminal,
        };
    }
}

pub(crate) fn base64_session_id(session_id: &[u8]) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    STANDARD.encode(session_id)
}
