//! The Responder (consumer) half: never initiates, validates the
//! Initiator's proposed version and algorithm set, and is the side that
//! first verifies a confirmation MAC.

use tracing::{debug, warn};

use subtyl_crypto::key_schedule::{derive_keys, DerivedKeys};
use subtyl_crypto::primitives::{constant_time_eq, parse_public_key};
use subtyl_crypto::{EphemeralKeyPair, Nonce, SessionId};

use crate::config::HandshakeConfig;
use crate::error::ErrorKind;
use crate::handshake::event::HandshakeEvent;
use crate::handshake::initiator::SessionKeys;
use crate::handshake::transcript::confirmation_mac;
use crate::wire::{HandshakeInit, HandshakeResponse, KeyConfirmation, KeyConfirmationRequest, WireMessage, PROTOCOL_VERSION};

/// Nonces are `Nonce`, not `[u8; 32]`, so they zeroize when a state is
/// replaced or the peer is dropped.
enum State {
    Fresh,
    AwaitingConfirmRequest {
        session_id: SessionId,
        own_nonce: Nonce,
        own_public: Vec<u8>,
        peer_nonce: Nonce,
        peer_public: Vec<u8>,
        keys: DerivedKeys,
    },
    Confirmed {
        session_id: SessionId,
        keys: DerivedKeys,
    },
    Failed {
        error: ErrorKind,
    },
}

pub struct Responder {
    config: HandshakeConfig,
    state: State,
}

impl Responder {
    pub fn new(config: HandshakeConfig) -> Self {
        Self {
            config,
            state: State::Fresh,
        }
    }

    pub fn session_id(&self) -> Option<String> {
        match &self.state {
            State::AwaitingConfirmRequest { session_id, .. }
            | State::Confirmed { session_id, .. } => Some(
                crate::handshake::initiator::base64_session_id(session_id.as_bytes()),
            ),
            _ => None,
        }
    }

    pub fn confirmed(&self) -> bool {
        matches!(self.state, State::Confirmed { .. })
    }

    pub fn derived_keys(&self) -> Option<SessionKeys> {
        match &self.state {
            State::Confirmed { keys, .. } => Some(SessionKeys {
                encryption: *keys.encryption.as_bytes(),
                authentication: *keys.authentication.as_bytes(),
            }),
            _ => None,
        }
    }

    /// The Responder never calls `start()` — it only ever reacts.
    pub fn handle(&mut self, message: &WireMessage) -> HandshakeEvent {
        match (&self.state, message) {
            (State::Fresh, WireMessage::HandshakeInit(init)) => self.handle_init(init.clone()),
            (
                State::AwaitingConfirmRequest { .. },
                WireMessage::KeyConfirmationRequest(req),
            ) => self.handle_confirm_request(req.clone()),
            (State::Failed { error }, _) => HandshakeEvent::failed(*error),
            (State::Confirmed { .. }, _) => HandshakeEvent::confirmed(None),
            _ => self.fail(ErrorKind::UnexpectedMessage),
        }
    }

    fn handle_init(&mut self, init: HandshakeInit) -> HandshakeEvent {
        if init.version != PROTOCOL_VERSION {
            return self.fail(ErrorKind::UnsupportedVersion);
        }

        let cipher = match self.config.select_cipher(&init.supported_ciphers) {
            Some(c) => c,
            None => return self.fail(ErrorKind::UnsupportedAlgorithm),
        };
        let hash = match self.config.select_hash(&init.supported_hashes) {
            Some(h) => h,
            None => return self.fail(ErrorKind::UnsupportedAlgorithm),
        };

        let peer_public = match parse_public_key(&init.public_key) {
            Ok(k) => k,
            Err(e) => return self.fail(e.into()),
        };
        let peer_nonce = match Nonce::from_slice(&init.provider_nonce) {
            Some(n) => n,
            None => return self.fail(ErrorKind::MalformedMessage),
        };
        let session_id = match SessionId::from_slice(&init.session_id) {
            Some(id) => id,
            None => return self.fail(ErrorKind::MalformedMessage),
        };

        let keypair = EphemeralKeyPair::generate();
        let own_nonce = match Nonce::generate() {
            Ok(n) => n,
            Err(e) => return self.fail(e.into()),
        };

        let shared = keypair.diffie_hellman(&peer_public);
        let keys = match derive_keys(&shared, peer_nonce.as_bytes(), own_nonce.as_bytes()) {
            Ok(k) => k,
            Err(e) => return self.fail(e.into()),
        };

        let own_public = keypair.public_key_sec1();
        let response = HandshakeResponse {
            session_id: session_id.as_bytes().to_vec(),
            public_key: own_public.clone(),
            consumer_nonce: own_nonce.as_bytes().to_vec(),
            selected_cipher: cipher,
            selected_hash: hash,
        };

        debug!("responder sending handshake-response");
        self.state = State::AwaitingConfirmRequest {
            session_id,
            own_nonce,
            own_public,
            peer_nonce,
            peer_public: init.public_key,
            keys,
        };
        HandshakeEvent::in_progress(WireMessage::HandshakeResponse(response))
    }

    fn handle_confirm_request(&mut self, req: KeyConfirmationRequest) -> HandshakeEvent {
        let (session_id, own_nonce, own_public, peer_nonce, peer_public, keys) =
            match std::mem::replace(&mut self.state, State::Fresh) {
                State::AwaitingConfirmRequest {
                    session_id,
                    own_nonce,
                    own_public,
                    peer_nonce,
                    peer_public,
                    keys,
                } => (session_id, own_nonce, own_public, peer_nonce, peer_public, keys),
                other => {
                    self.state = other;
                    return self.fail(ErrorKind::UnexpectedMessage);
                }
            };

        let expected_mac_i = confirmation_mac(
            &keys,
            peer_nonce.as_bytes(),
            own_nonce.as_bytes(),
            &peer_public,
            &own_public,
        );
        if !constant_time_eq(&req.confirmation_mac, &expected_mac_i) {
            warn!("responder rejected confirmation mac");
            self.state = State::Failed {
                error: ErrorKind::KeyConfirmationFailed,
            };
            return HandshakeEvent::failed(ErrorKind::KeyConfirmationFailed);
        }

        let mac_r = confirmation_mac(
            &keys,
            own_nonce.as_bytes(),
            peer_nonce.as_bytes(),
            &own_public,
            &peer_public,
        );
        let confirmation = KeyConfirmation {
            session_id: session_id.as_bytes().to_vec(),
            public_key: own_public,
            confirmation_mac: mac_r.to_vec(),
        };

        debug!("responder confirmed");
        self.state = State::Confirmed { session_id, keys };
        HandshakeEvent::confirmed(Some(WireMessage::KeyConfirmation(confirmation)))
    }

    fn fail(&mut self, error: ErrorKind) -> HandshakeEvent {
        self.state = State::Failed { error };
        HandshakeEvent::failed(error)
    }

    pub fn destroy(&mut self) {
        self.state = State::Failed {
            error: ErrorKind::Terminal,
        };
    }
}
