mod common;

use common::{private_key, private_key_pem, public_key, public_key_line};
use proptest::prelude::*;
use sshbox::container::{decode_detect, Format};
use sshbox::{
    decode, decrypt, encode, encrypt, open, parse_private_key, parse_public_key, seal,
    SshboxError,
};
use std::error::Error;

#[test]
fn hello_world_through_both_formats() -> Result<(), Box<dyn Error>> {
    let public = parse_public_key(public_key_line().as_bytes())?;
    assert_eq!(public.bits(), 2048);

    let sealed = seal(b"hello world", &public)?;

    let armored = encode(&sealed, true)?;
    let text = String::from_utf8(armored.clone())?;
    assert!(text.starts_with("-----BEGIN SSHBOX ENCRYPTED FILE-----"));
    assert!(text.trim_end().ends_with("-----END SSHBOX ENCRYPTED FILE-----"));

    let binary = encode(&sealed, false)?;
    let from_armored = decode(&armored)?;
    let from_binary = decode(&binary)?;
    assert_eq!(from_armored, from_binary);
    assert_eq!(from_armored, sealed);

    let private = parse_private_key(private_key_pem().as_bytes())?;
    assert_eq!(open(from_armored, &private)?, b"hello world");
    assert_eq!(open(from_binary, &private)?, b"hello world");
    Ok(())
}

#[test]
fn empty_message() -> Result<(), Box<dyn Error>> {
    let data = encrypt(b"", &public_key(), false)?;
    assert!(decrypt(&data, &private_key())?.is_empty());
    Ok(())
}

#[test]
fn format_is_detected_without_a_hint() -> Result<(), Box<dyn Error>> {
    let public = public_key();
    for (armor, expected) in [(false, Format::Binary), (true, Format::Armored)] {
        let data = encrypt(b"which format am I?", &public, armor)?;
        let (_, detected) = decode_detect(&data)?;
        assert_eq!(detected, expected);
        assert_eq!(decrypt(&data, &private_key())?, b"which format am I?");
    }
    Ok(())
}

#[test]
fn tampered_armored_body_fails() -> Result<(), Box<dyn Error>> {
    let data = encrypt(b"do not touch", &public_key(), false)?;
    let mut sealed = decode(&data)?.into_parts();
    let last = sealed.1.len() - 1;
    sealed.1[last] ^= 0x80;
    let tampered = encode(&sshbox::SealedContainer::new(sealed.0, sealed.1), true)?;

    let result = decrypt(&tampered, &private_key());
    assert!(matches!(result, Err(SshboxError::AuthenticationFailure)));
    Ok(())
}

#[test]
fn unsupported_key_algorithm() {
    let ecdsa = "ecdsa-sha2-nistp256 AAAAE2VjZHNhLXNoYTItbmlzdHAyNTYAAAAIbmlzdHAyNTYAAABBBEmKSENjQEezOmxkZMy7opKgwFB9nkt5YRrYMjNuG5N87uRgg6CLrbo5wAdT/y6v0mKV0U2w0WZ2YB/++Tpockg= host";
    assert!(matches!(
        parse_public_key(ecdsa.as_bytes()),
        Err(SshboxError::UnsupportedAlgorithm(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_seal_open_roundtrip(
        message in proptest::collection::vec(any::<u8>(), 0..4096),
        armor in any::<bool>(),
    ) {
        let data = encrypt(&message, &public_key(), armor)?;
        prop_assert_eq!(decrypt(&data, &private_key())?, message);
    }

    #[test]
    fn prop_seal_is_fresh(message in proptest::collection::vec(any::<u8>(), 0..256)) {
        let public = public_key();
        let first = seal(&message, &public)?;
        let second = seal(&message, &public)?;
        prop_assert_ne!(first.locked_key(), second.locked_key());
        prop_assert_ne!(first.sealed_box(), second.sealed_box());
    }
}
