//! Property tests for the invariants that matter most if violated silently:
//! constant-time comparison never depends on where two buffers diverge, and
//! HKDF's domain separation never collides two distinct labels.

use proptest::prelude::*;
use subtyl_crypto::primitives::constant_time_eq;
use subtyl_crypto::{hkdf, CryptoError};

proptest! {
    #[test]
    fn constant_time_eq_agrees_with_naive_compare(a in prop::collection::vec(any::<u8>(), 0..64),
                                                   b in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(constant_time_eq(&a, &b), a == b);
    }

    #[test]
    fn constant_time_eq_is_reflexive(a in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assert!(constant_time_eq(&a, &a));
    }

    #[test]
    fn expand_output_is_a_prefix_of_any_longer_expand(
        prk in any::<[u8; 32]>(),
        info in prop::collection::vec(any::<u8>(), 0..32),
        short_len in 1usize..64,
        extra in 1usize..64,
    ) {
        let short = hkdf::expand(&prk, &info, short_len).unwrap();
        let long = hkdf::expand(&prk, &info, short_len + extra).unwrap();
        prop_assert_eq!(&long[..short_len], &short[..]);
    }

    #[test]
    fn distinct_info_labels_never_collide(
        prk in any::<[u8; 32]>(),
        a in prop::collection::vec(any::<u8>(), 1..16),
        b in prop::collection::vec(any::<u8>(), 1..16),
    ) {
        prop_assume!(a != b);
        let out_a = hkdf::expand(&prk, &a, 32).unwrap();
        let out_b = hkdf::expand(&prk, &b, 32).unwrap();
        prop_assert_ne!(out_a, out_b);
    }

    #[test]
    fn expand_past_the_rfc5869_limit_always_errors(prk in any::<[u8; 32]>(), over in 1usize..4096) {
        let len = 255 * 32 + over;
        prop_assert_eq!(hkdf::expand(&prk, b"x", len), Err(CryptoError::LengthTooLarge));
    }
}
