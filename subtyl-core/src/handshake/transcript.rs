//! The transcript-bound confirmation MACs. Byte order is asymmetric by
//! design: each side lists its own nonce and public key first, so one
//! direction's tag can never be replayed as the other's.

use subtyl_crypto::key_schedule::DerivedKeys;
use subtyl_crypto::primitives::hmac_sha256;

/// `HMAC(K_conf, own_nonce || peer_nonce || own_pub || peer_pub)`. Called
/// once by whichever side is producing its own tag, and again by the
/// receiving side to recompute the tag it expects — with the nonce/key
/// arguments swapped, since "own" and "peer" trade places.
pub fn confirmation_mac(
    keys: &DerivedKeys,
    own_nonce: &[u8; 32],
    peer_nonce: &[u8; 32],
    own_public: &[u8],
    peer_public: &[u8],
) -> [u8; 32] {
    hmac_sha256(
        keys.confirmation.as_bytes(),
        &[own_nonce, peer_nonce, own_public, peer_public],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtyl_crypto::key_schedule::derive_keys;
    use subtyl_crypto::primitives::SharedSecret;

    #[test]
    fn initiator_and_responder_macs_differ() {
        let keys = derive_keys(&SharedSecret::from_bytes([1u8; 32]), &[2u8; 32], &[3u8; 32])
            .unwrap();
        let n_i = [2u8; 32];
        let n_r = [3u8; 32];
        let pk_i = vec![4u8; 65];
        let pk_r = vec![5u8; 65];

        let mac_i = confirmation_mac(&keys, &n_i, &n_r, &pk_i, &pk_r);
        let mac_r = confirmation_mac(&keys, &n_r, &n_i, &pk_r, &pk_i);
        assert_ne!(mac_i, mac_r);
    }

    #[test]
    fn each_side_recomputes_the_others_tag_identically() {
        let keys_a = derive_keys(&SharedSecret::from_bytes([9u8; 32]), &[1u8; 32], &[2u8; 32])
            .unwrap();
        let keys_b = derive_keys(&SharedSecret::from_bytes([9u8; 32]), &[1u8; 32], &[2u8; 32])
            .unwrap();
        let pk_i = vec![6u8; 65];
        let pk_r = vec![7u8; 65];

        // Initiator computes MAC_I over its own view.
        let produced = confirmation_mac(&keys_a, &[1u8; 32], &[2u8; 32], &pk_i, &pk_r);
        // Responder recomputes the MAC_I it expects from its own view.
        let expected = confirmation_mac(&keys_b, &[1u8; 32], &[2u8; 32], &pk_i, &pk_r);
        assert_eq!(produced, expected);
    }
}
