use subtyl_crypto::key_schedule::derive_keys;
use subtyl_crypto::primitives::SharedSecret;

fn main() {
    divan::main();
}

#[divan::bench]
fn derive_three_keys() -> usize {
    let secret = SharedSecret::from_bytes(divan::black_box([9u8; 32]));
    let keys = derive_keys(&secret, &[1u8; 32], &[2u8; 32]).unwrap();
    keys.encryption.as_bytes().len()
        + keys.authentication.as_bytes().len()
        + keys.confirmation.as_bytes().len()
}
