//! End-to-end handshake scenarios, one per named case in the test matrix:
//! happy path, then one deliberate fault per state-machine rule.

use subtyl_core::{
    AeadChannel, ErrorKind, HandshakeConfig, HandshakeStatus, Initiator, Responder, WireMessage,
};

fn pair() -> (Initiator, Responder) {
    (
        Initiator::new(HandshakeConfig::default()).unwrap(),
        Responder::new(HandshakeConfig::default()),
    )
}

#[test]
fn s1_happy_path_confirms_with_equal_keys_and_round_trips_a_message() {
    let (mut initiator, mut responder) = pair();

    let init_event = initiator.start();
    let init_msg = init_event.outbound.expect("init produces handshake-init");

    let resp_event = responder.handle(&init_msg);
    let resp_msg = resp_event
        .outbound
        .expect("responder produces handshake-response");

    let req_event = initiator.handle(&resp_msg);
    let req_msg = req_event
        .outbound
        .expect("initiator produces key-confirmation-request");

    let conf_event = responder.handle(&req_msg);
    assert_eq!(conf_event.status, HandshakeStatus::Confirmed);
    let conf_msg = conf_event
        .outbound
        .expect("responder produces key-confirmation");

    let final_event = initiator.handle(&conf_msg);
    assert_eq!(final_event.status, HandshakeStatus::Confirmed);

    assert!(initiator.confirmed());
    assert!(responder.confirmed());

    let i_keys = initiator.derived_keys().unwrap();
    let r_keys = responder.derived_keys().unwrap();
    assert_eq!(i_keys.encryption, r_keys.encryption);
    assert_eq!(i_keys.authentication, r_keys.authentication);

    let i_channel = AeadChannel::new(initiator.derived_keys().unwrap());
    let r_channel = AeadChannel::new(responder.derived_keys().unwrap());
    let envelope = i_channel.encrypt(b"hello").unwrap();
    let plaintext = r_channel.decrypt(&envelope).unwrap();
    assert_eq!(plaintext, b"hello");
}

#[test]
fn s2_session_id_rewritten_in_flight_fails_the_initiator() {
    let (mut initiator, mut responder) = pair();

    let init_msg = initiator.start().outbound.unwrap();
    let resp_event = responder.handle(&init_msg);
    let mut resp_msg = resp_event.outbound.unwrap();

    if let WireMessage::HandshakeResponse(ref mut resp) = resp_msg {
        resp.session_id = vec![0xAB; 16];
    }

    let event = initiator.handle(&resp_msg);
    assert_eq!(event.status, HandshakeStatus::Failed);
    assert_eq!(event.error, Some(ErrorKind::SessionIdMismatch));
}

#[test]
fn s3_tampered_confirmation_mac_fails_the_responder() {
    let (mut initiator, mut responder) = pair();

    let init_msg = initiator.start().outbound.unwrap();
    let resp_msg = responder.handle(&init_msg).outbound.unwrap();
    let mut req_msg = initiator.handle(&resp_msg).outbound.unwrap();

    if let WireMessage::KeyConfirmationRequest(ref mut req) = req_msg {
        req.confirmation_mac[0] ^= 0xFF;
    }

    let event = responder.handle(&req_msg);
    assert_eq!(event.status, HandshakeStatus::Failed);
    assert_eq!(event.error, Some(ErrorKind::KeyConfirmationFailed));
}

#[test]
fn s4_version_skew_fails_before_any_response_is_sent() {
    let (mut initiator, mut responder) = pair();
    let mut init_msg = initiator.start().outbound.unwrap();
    if let WireMessage::HandshakeInit(ref mut init) = init_msg {
        init.version = 999;
    }

    let event = responder.handle(&init_msg);
    assert_eq!(event.status, HandshakeStatus::Failed);
    assert_eq!(event.error, Some(ErrorKind::UnsupportedVersion));
    assert!(event.outbound.is_none());
}

#[test]
fn s5_unsupported_algorithms_are_rejected() {
    // `CipherSuite`/`HashSuite` are closed enums, so an unrecognized name on
    // the wire fails at deserialization rather than reaching the responder.
    // A peer offering only algorithms the responder doesn't support is the
    // reachable form of this case: an empty offer list.
    let (mut initiator, mut responder) = pair();
    let mut init_msg = initiator.start().outbound.unwrap();
    if let WireMessage::HandshakeInit(ref mut init) = init_msg {
        init.supported_ciphers = vec![];
        init.supported_hashes = vec![];
    }

    let event = responder.handle(&init_msg);
    assert_eq!(event.error, Some(ErrorKind::UnsupportedAlgorithm));
}

#[test]
fn s5b_unrecognized_algorithm_name_fails_to_deserialize() {
    let json = br#"{"type":"handshake-init","version":1,"sessionId":"AAAAAAAAAAAAAAAAAAAAAA==","publicKey":"AAAA","providerNonce":"AAAA","supportedCiphers":["weak-cipher"],"supportedHashes":["sha256"]}"#;
    assert!(WireMessage::from_json(json).is_none());
}

#[test]
fn s6_malformed_json_does_not_parse_into_a_message() {
    assert!(WireMessage::from_json(b"not-json{").is_none());
}

#[test]
fn s7_hkdf_expand_limit_is_enforced() {
    let prk = [0u8; 32];
    assert!(subtyl_crypto::hkdf::expand(&prk, b"x", 255 * 32).is_ok());
    assert_eq!(
        subtyl_crypto::hkdf::expand(&prk, b"x", 255 * 32 + 1),
        Err(subtyl_crypto::CryptoError::LengthTooLarge)
    );
}

#[test]
fn s8_tampered_ciphertext_fails_aead_decrypt() {
    let (mut initiator, mut responder) = pair();
    let init_msg = initiator.start().outbound.unwrap();
    let resp_msg = responder.handle(&init_msg).outbound.unwrap();
    let req_msg = initiator.handle(&resp_msg).outbound.unwrap();
    let conf_msg = responder.handle(&req_msg).outbound.unwrap();
    initiator.handle(&conf_msg);

    let channel = AeadChannel::new(initiator.derived_keys().unwrap());
    let mut envelope = channel.encrypt(b"payload").unwrap();
    envelope.encrypted.data[0] ^= 0xFF;
    assert_eq!(
        channel.decrypt(&envelope).unwrap_err(),
        ErrorKind::AeadTagMismatch
    );
}

#[test]
fn destroy_is_idempotent_and_leaves_the_peer_terminal() {
    let mut initiator = Initiator::new(HandshakeConfig::default()).unwrap();
    initiator.start();
    initiator.destroy();
    initiator.destroy();
    assert!(!initiator.confirmed());
    assert!(initiator.derived_keys().is_none());
}
