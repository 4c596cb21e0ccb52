//! The algorithm set is the only configuration this protocol takes. No
//! environment variables, no persisted state — a `HandshakeConfig` is
//! constructed once and handed to both peers.

use crate::algorithms::{CipherSuite, HashSuite};

/// The cipher/hash pairs a peer is willing to negotiate. The current
/// protocol version has exactly one of each; the lists exist so a future
/// version can add options without changing the wire shape.
#[derive(Debug, Clone)]
pub struct HandshakeConfig {
    pub supported_ciphers: Vec<CipherSuite>,
    pub supported_hashes: Vec<HashSuite>,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            supported_ciphers: vec![CipherSuite::Aes256Gcm],
            supported_hashes: vec![HashSuite::Sha256],
        }
    }
}

impl HandshakeConfig {
    /// The Responder's tie-break: if more than one algorithm pair were ever
    /// mutually supported, it picks the first entry in its own preference
    /// list that the peer also offers. Exactly one pair exists today, so
    /// this always resolves trivially, but the selection step stays in
    /// place for when it doesn't.
    pub fn select_cipher(&self, peer_supported: &[CipherSuite]) -> Option<CipherSuite> {
        self.supported_ciphers
            .iter()
            .copied()
            .find(|c| peer_supported.contains(c))
    }

    pub fn select_hash(&self, peer_supported: &[HashSuite]) -> Option<HashSuite> {
        self.supported_hashes
            .iter()
            .copied()
            .find(|h| peer_supported.contains(h))
    }
}
