//! Hybrid sealing.
//!
//! Every seal draws a fresh 256-bit box key. The message is encrypted with
//! AES-256-GCM under that key and the key itself is locked to the recipient
//! with RSA-OAEP. The OAEP hash is fixed to SHA-256 and is not recorded in the
//! container, so both sides must agree on it.
//!
//! ```text
//! box        = nonce (12) || AES-256-GCM ciphertext || tag (16)
//! locked key = RSA-OAEP-SHA256(box key), modulus-sized
//! ```

use crate::container::SealedContainer;
use crate::error::{Result, SshboxError};
use crate::key::{PrivateKeyMaterial, PublicKeyMaterial};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::Oaep;
use sha2::Sha256;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// AES-256 key size in bytes
pub const SYMMETRIC_KEY_SIZE: usize = 32;

/// AES-GCM nonce size in bytes
pub const NONCE_SIZE: usize = 12;

/// AES-GCM tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Bytes a box adds on top of the message
pub const BOX_OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;

/// Ephemeral box key, wiped on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_SIZE]);

impl SymmetricKey {
    /// Draw a new key. A failing random source is fatal.
    fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let mut key = Self([0u8; SYMMETRIC_KEY_SIZE]);
        rng.try_fill_bytes(&mut key.0)
            .map_err(|_| SshboxError::KeyGenerationFailure)?;
        Ok(key)
    }

    /// Accept an unwrapped key only if it has the exact key size
    fn from_unwrapped(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SYMMETRIC_KEY_SIZE {
            return Err(SshboxError::InvalidKey);
        }
        let mut key = Self([0u8; SYMMETRIC_KEY_SIZE]);
        key.0.copy_from_slice(bytes);
        Ok(key)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0))
    }
}

fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Seal `message` to `public` using the operating system's CSPRNG
pub fn seal(message: &[u8], public: &PublicKeyMaterial) -> Result<SealedContainer> {
    seal_with_rng(&mut OsRng, message, public)
}

/// Seal `message` to `public`, drawing the box key, nonce and OAEP seed
/// from `rng`
pub fn seal_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    message: &[u8],
    public: &PublicKeyMaterial,
) -> Result<SealedContainer> {
    let key = SymmetricKey::generate(rng)?;

    let mut nonce = [0u8; NONCE_SIZE];
    rng.try_fill_bytes(&mut nonce)
        .map_err(|_| SshboxError::KeyGenerationFailure)?;

    let ciphertext = key
        .cipher()
        .encrypt(Nonce::from_slice(&nonce), message)
        .map_err(|_| SshboxError::EncryptionFailure("failed to seal the message".into()))?;
    let mut sealed_box = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed_box.extend_from_slice(&nonce);
    sealed_box.extend_from_slice(&ciphertext);

    let locked_key = public
        .as_rsa()
        .encrypt(rng, oaep(), &key.0)
        .map_err(|e| SshboxError::EncryptionFailure(format!("RSA encryption failed: {}", e)))?;

    debug!(
        message_len = message.len(),
        locked_key_len = locked_key.len(),
        box_len = sealed_box.len(),
        "sealed message"
    );
    Ok(SealedContainer::new(locked_key, sealed_box))
}

/// Recover the message from `container` with `private`
pub fn open(container: SealedContainer, private: &PrivateKeyMaterial) -> Result<Vec<u8>> {
    let unwrapped = private
        .as_rsa()
        .decrypt_blinded(&mut OsRng, oaep(), container.locked_key())
        .map(Zeroizing::new)
        .map_err(|_| SshboxError::InvalidKey)?;
    let key = SymmetricKey::from_unwrapped(&unwrapped)?;

    let sealed_box = container.sealed_box();
    if sealed_box.len() < BOX_OVERHEAD {
        return Err(SshboxError::AuthenticationFailure);
    }
    let (nonce, ciphertext) = sealed_box.split_at(NONCE_SIZE);
    let message = key
        .cipher()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| SshboxError::AuthenticationFailure)?;

    debug!(message_len = message.len(), "opened box");
    Ok(message)
}
