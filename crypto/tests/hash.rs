use tessera_crypto::hash::{calculate_sha256, Sha256};

#[test]
fn sha256_known_vector() {
    let hash = calculate_sha256(b"abc");
    let expected = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    assert_eq!(hash.to_string(), expected);
}

#[test]
fn sha256_is_deterministic() {
    let script = vec![0x00, 0x14, 0xaa, 0xbb];

    assert_eq!(calculate_sha256(&script), calculate_sha256(&script));
    assert_ne!(calculate_sha256(&script), Sha256::default());
}
