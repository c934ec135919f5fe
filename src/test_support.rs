//! Shared RSA fixtures for unit tests. Key generation is slow, so one
//! 2048-bit key is generated per test binary.

use crate::key::PublicKeyMaterial;
use rand::rngs::OsRng;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use std::sync::OnceLock;

pub(crate) fn private_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("RSA key generation"))
}

pub(crate) fn other_private_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("RSA key generation"))
}

pub(crate) fn public_key() -> PublicKeyMaterial {
    PublicKeyMaterial::from(private_key().to_public_key())
}

pub(crate) fn private_key_pem() -> String {
    private_key()
        .to_pkcs1_pem(LineEnding::LF)
        .expect("PKCS#1 encoding")
        .as_str()
        .to_owned()
}
