//! The post-handshake AEAD channel: a capability set of
//! `{encrypt, decrypt, algorithm_name}` with one default implementor.
//! Adding a second cipher means adding another implementor, not growing an
//! inheritance hierarchy.

use subtyl_crypto::primitives::{aead_decrypt, aead_encrypt, random_array, AEAD_IV_LEN};
use zeroize::Zeroize;

use crate::algorithms::CipherSuite;
use crate::error::ErrorKind;
use crate::handshake::SessionKeys;
use crate::wire::{EncryptedMetadata, EncryptedPayload, EncryptedPluginMessage};

pub trait AeadAlgorithm {
    fn algorithm_name(&self) -> CipherSuite;
    fn encrypt(&self, key: &[u8; 32], plaintext: &[u8]) -> Result<EncryptedPluginMessage, ErrorKind>;
    fn decrypt(&self, key: &[u8; 32], message: &EncryptedPluginMessage) -> Result<Vec<u8>, ErrorKind>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Aes256GcmChannelImpl;

impl AeadAlgorithm for Aes256GcmChannelImpl {
    fn algorithm_name(&self) -> CipherSuite {
        CipherSuite::Aes256Gcm
    }

    fn encrypt(&self, key: &[u8; 32], plaintext: &[u8]) -> Result<EncryptedPluginMessage, ErrorKind> {
        let iv = random_array::<AEAD_IV_LEN>()?;
        let data = aead_encrypt(key, &iv, &[], plaintext);
        let tag_offset = data.len() - subtyl_crypto::primitives::AEAD_TAG_LEN;
        let (ciphertext, tag) = data.split_at(tag_offset);

        Ok(EncryptedPluginMessage {
            algorithm: self.algorithm_name(),
            encrypted: EncryptedPayload {
                data: ciphertext.to_vec(),
                metadata: EncryptedMetadata {
                    iv: iv.to_vec(),
                    tag: tag.to_vec(),
                },
            },
        })
    }

    fn decrypt(&self, key: &[u8; 32], message: &EncryptedPluginMessage) -> Result<Vec<u8>, ErrorKind> {
        if message.algorithm != self.algorithm_name() {
            return Err(ErrorKind::UnsupportedAlgorithm);
        }
        let iv: [u8; AEAD_IV_LEN] = message
            .encrypted
            .metadata
            .iv
            .as_slice()
            .try_into()
            .map_err(|_| ErrorKind::MalformedMessage)?;

        let mut combined = message.encrypted.data.clone();
        combined.extend_from_slice(&message.encrypted.metadata.tag);

        aead_decrypt(key, &iv, &[], &combined).map_err(Into::into)
    }
}

/// Wraps the encryption key established by a confirmed handshake. The
/// authentication key is accepted, reserved for a future record-layer MAC,
/// and zeroized immediately — this channel never reads it.
pub struct AeadChannel<A: AeadAlgorithm = Aes256GcmChannelImpl> {
    encryption_key: [u8; 32],
    algorithm: A,
}

impl AeadChannel<Aes256GcmChannelImpl> {
    pub fn new(mut keys: SessionKeys) -> Self {
        keys.authentication.zeroize();
        Self {
            encryption_key: keys.encryption,
            algorithm: Aes256GcmChannelImpl,
        }
    }
}

impl<A: AeadAlgorithm> AeadChannel<A> {
    pub fn with_algorithm(mut keys: SessionKeys, algorithm: A) -> Self {
        keys.authentication.zeroize();
        Self {
            encryption_key: keys.encryption,
            algorithm,
        }
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedPluginMessage, ErrorKind> {
        self.algorithm.encrypt(&self.encryption_key, plaintext)
    }

    pub fn decrypt(&self, message: &EncryptedPluginMessage) -> Result<Vec<u8>, ErrorKind> {
        self.algorithm.decrypt(&self.encryption_key, message)
    }
}

impl<A: AeadAlgorithm> Drop for AeadChannel<A> {
    fn drop(&mut self) {
        self.encryption_key.zeroize();
    }
}
