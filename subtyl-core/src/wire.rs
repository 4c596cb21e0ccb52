//! The four handshake messages and the post-handshake envelope, exactly as
//! they appear on the wire: a UTF-8 JSON object, binary fields base64
//! (standard alphabet, padded). Field names here are load-bearing for
//! interop with any other implementation of this protocol — do not rename
//! them to be more idiomatic.

use serde::{Deserialize, Serialize};

use crate::algorithms::{CipherSuite, HashSuite};

pub const PROTOCOL_VERSION: u32 = 1;

/// Serializes/deserializes a byte buffer as standard-alphabet, padded
/// base64, the encoding every binary field on the wire uses.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeInit {
    pub version: u32,
    #[serde(with = "base64_bytes")]
    pub session_id: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub public_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub provider_nonce: Vec<u8>,
    pub supported_ciphers: Vec<CipherSuite>,
    pub supported_hashes: Vec<HashSuite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeResponse {
    #[serde(with = "base64_bytes")]
    pub session_id: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub public_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub consumer_nonce: Vec<u8>,
    pub selected_cipher: CipherSuite,
    pub selected_hash: HashSuite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyConfirmationRequest {
    #[serde(with = "base64_bytes")]
    pub confirmation_mac: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyConfirmation {
    #[serde(with = "base64_bytes")]
    pub session_id: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub public_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub confirmation_mac: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedMetadata {
    #[serde(with = "base64_bytes")]
    pub iv: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub tag: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPayload {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub metadata: EncryptedMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPluginMessage {
    pub algorithm: CipherSuite,
    pub encrypted: EncryptedPayload,
}

/// The union of every message this protocol exchanges, tagged by its wire
/// `type` field. Deserializing an unrecognized `type` or a structurally
/// invalid body both surface as one failure at the call site: the caller
/// never needs to distinguish "not JSON" from "JSON but wrong shape".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WireMessage {
    HandshakeInit(HandshakeInit),
    HandshakeResponse(HandshakeResponse),
    KeyConfirmationRequest(KeyConfirmationRequest),
    KeyConfirmation(KeyConfirmation),
    EncryptedPluginMessage(EncryptedPluginMessage),
}

impl WireMessage {
    /// Parse a message off the transport. Any JSON or shape error collapses
    /// to `None` — callers map that to `ErrorKind::MalformedMessage`.
    pub fn from_json(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }

    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("wire messages always serialize")
    }
}
