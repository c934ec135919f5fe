//! sshbox - encrypt files to an SSH RSA public key
//!
//! A fresh AES-256-GCM key encrypts the file, and that key is locked to the
//! recipient's `ssh-rsa` public key with RSA-OAEP (SHA-256). Only the holder
//! of the matching private key can open the result.
//!
//! ## Pipeline
//!
//! ```text
//! encrypt: public key line → parse_public_key → seal → encode (binary or armored)
//! decrypt: container bytes → decode (auto-detect) → parse_private_key → open
//! ```
//!
//! - **key**: OpenSSH wire-format public keys, PEM PKCS#1 private keys
//! - **cipher**: seal/open of the locked key and the box
//! - **container**: DER `SEQUENCE { lockedKey, box }`, optionally armored as
//!   `SSHBOX ENCRYPTED FILE`
//! - **source**: key retrieval from disk or HTTP(S)
//!
//! ## Example
//!
//! ```no_run
//! use sshbox::cli::{decrypt_file, encrypt_file, DecryptOptions, EncryptOptions};
//! use std::path::Path;
//!
//! let encrypt_opts = EncryptOptions {
//!     key: "id_rsa.pub".into(),
//!     armor: true,
//! };
//! encrypt_file(Path::new("notes.txt"), Path::new("notes.box"), &encrypt_opts).unwrap();
//!
//! let decrypt_opts = DecryptOptions {
//!     key: "id_rsa".into(),
//! };
//! decrypt_file(Path::new("notes.box"), Path::new("notes.txt"), &decrypt_opts).unwrap();
//! ```

pub mod armor;
pub mod cipher;
pub mod cli;
pub mod container;
pub mod error;
pub mod key;
pub mod source;

#[cfg(test)]
mod test_support;

pub use cipher::{open, seal, SymmetricKey};
pub use container::{decode, encode, Format, SealedContainer};
pub use error::{Result, SshboxError};
pub use key::{parse_private_key, parse_public_key, PrivateKeyMaterial, PublicKeyMaterial};

/// Seal `message` to `public` and serialize the container
pub fn encrypt(message: &[u8], public: &PublicKeyMaterial, armor: bool) -> Result<Vec<u8>> {
    let sealed = seal(message, public)?;
    encode(&sealed, armor)
}

/// Decode a container in either format and open it with `private`
pub fn decrypt(data: &[u8], private: &PrivateKeyMaterial) -> Result<Vec<u8>> {
    let sealed = decode(data)?;
    open(sealed, private)
}
