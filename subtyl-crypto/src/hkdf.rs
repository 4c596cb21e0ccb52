//! RFC 5869 HKDF over HMAC-SHA-256: Extract then Expand.
//!
//! Generalizes the teacher's fixed-output, compile-time-block-count `hkdf`
//! helper into a runtime-length `expand`, with the `L > 255 * 32`
//! overflow guard RFC 5869 requires and the teacher's version omits.

use crate::error::CryptoError;
use crate::primitives::hmac_sha256;

const HASH_LEN: usize = 32;
const MAX_OUTPUT_LEN: usize = 255 * HASH_LEN;

/// `PRK = HMAC(salt, IKM)`.
pub fn extract(salt: &[u8], ikm: &[u8]) -> [u8; HASH_LEN] {
    hmac_sha256(salt, &[ikm])
}

/// `T(1) || T(2) || … || T(n)` where `T(i) = HMAC(PRK, T(i-1) || info || i)`,
/// truncated to `l` bytes. Rejects `l > 255 * 32` with `LengthTooLarge`.
pub fn expand(prk: &[u8; HASH_LEN], info: &[u8], l: usize) -> Result<Vec<u8>, CryptoError> {
    if l > MAX_OUTPUT_LEN {
        return Err(CryptoError::LengthTooLarge);
    }

    let n = l.div_ceil(HASH_LEN);
    let mut okm = Vec::with_capacity(n * HASH_LEN);
    let mut t_prev: Vec<u8> = Vec::new();

    for i in 1..=n {
        let counter = [i as u8];
        let t_i = hmac_sha256(prk, &[&t_prev, info, &counter]);
        okm.extend_from_slice(&t_i);
        t_prev = t_i.to_vec();
    }

    okm.truncate(l);
    Ok(okm)
}

/// Extract-then-Expand in one call.
pub fn derive(salt: &[u8], ikm: &[u8], info: &[u8], l: usize) -> Result<Vec<u8>, CryptoError> {
    let prk = extract(salt, ikm);
    expand(&prk, info, l)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_at_the_limit_succeeds() {
        let prk = [0u8; HASH_LEN];
        assert!(expand(&prk, b"info", MAX_OUTPUT_LEN).is_ok());
    }

    #[test]
    fn expand_past_the_limit_fails() {
        let prk = [0u8; HASH_LEN];
        assert_eq!(
            expand(&prk, b"info", MAX_OUTPUT_LEN + 1).unwrap_err(),
            CryptoError::LengthTooLarge
        );
    }

    #[test]
    fn expand_is_deterministic() {
        let prk = [9u8; HASH_LEN];
        let a = expand(&prk, b"context", 100).unwrap();
        let b = expand(&prk, b"context", 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn expand_output_is_a_prefix_of_a_longer_expand() {
        let prk = [3u8; HASH_LEN];
        let short = expand(&prk, b"ctx", 40).unwrap();
        let long = expand(&prk, b"ctx", 96).unwrap();
        assert_eq!(&long[..40], &short[..]);
    }

    #[test]
    fn different_info_yields_different_output() {
        let prk = [1u8; HASH_LEN];
        let a = expand(&prk, b"label-a", 32).unwrap();
        let b = expand(&prk, b"label-b", 32).unwrap();
        assert_ne!(a, b);
    }
}
