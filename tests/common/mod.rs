#![allow(dead_code)]

use rand::rngs::OsRng;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use sshbox::{PrivateKeyMaterial, PublicKeyMaterial};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub fn rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("RSA key generation"))
}

pub fn public_key() -> PublicKeyMaterial {
    PublicKeyMaterial::from(rsa_key().to_public_key())
}

pub fn private_key() -> PrivateKeyMaterial {
    PrivateKeyMaterial::from(rsa_key().clone())
}

pub fn public_key_line() -> String {
    public_key().to_openssh("tester@sshbox")
}

pub fn private_key_pem() -> String {
    rsa_key()
        .to_pkcs1_pem(LineEnding::LF)
        .expect("PKCS#1 encoding")
        .as_str()
        .to_owned()
}

/// Write `id_rsa.pub` and `id_rsa` into `dir`
pub fn write_key_pair(dir: &Path) -> (PathBuf, PathBuf) {
    let public = dir.join("id_rsa.pub");
    let private = dir.join("id_rsa");
    std::fs::write(&public, public_key_line()).expect("write public key");
    std::fs::write(&private, private_key_pem()).expect("write private key");
    (public, private)
}
