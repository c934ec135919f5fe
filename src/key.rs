//! RSA key parsing.
//!
//! Public keys arrive in the single-line OpenSSH form
//! (`ssh-rsa <base64 blob> [comment]`). The blob is a sequence of
//! length-prefixed fields: algorithm name, public exponent, modulus.
//! Private keys arrive as a PEM `RSA PRIVATE KEY` block holding PKCS#1 DER.

use crate::armor;
use crate::error::{Result, SshboxError};
use base64::prelude::*;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

/// The only supported public key algorithm
pub const RSA_ALGORITHM: &str = "ssh-rsa";

/// PEM label of a PKCS#1 RSA private key
pub const PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// Largest modulus accepted from a public key blob
const MAX_MODULUS_BITS: usize = 16384;

/// Size of a wire-format length prefix
const LENGTH_PREFIX_SIZE: usize = 4;

/// An RSA public key recovered from its wire format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    key: RsaPublicKey,
}

impl PublicKeyMaterial {
    /// Build a public key from its big-endian components
    pub fn new(modulus: BigUint, exponent: BigUint) -> Result<Self> {
        RsaPublicKey::new_with_max_size(modulus, exponent, MAX_MODULUS_BITS)
            .map(|key| Self { key })
            .map_err(|e| SshboxError::InvalidKeyFormat(format!("unusable RSA public key: {}", e)))
    }

    pub fn modulus(&self) -> &BigUint {
        self.key.n()
    }

    pub fn exponent(&self) -> &BigUint {
        self.key.e()
    }

    /// Modulus length in bytes, which is also the locked key length
    pub fn size(&self) -> usize {
        self.key.size()
    }

    /// Modulus length in bits
    pub fn bits(&self) -> usize {
        self.key.n().bits()
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.key
    }

    /// Encode as an OpenSSH wire blob
    pub fn to_wire(&self) -> Vec<u8> {
        let exponent = mpint(self.exponent());
        let modulus = mpint(self.modulus());
        let mut out = Vec::with_capacity(
            3 * LENGTH_PREFIX_SIZE + RSA_ALGORITHM.len() + exponent.len() + modulus.len(),
        );
        put_field(&mut out, RSA_ALGORITHM.as_bytes());
        put_field(&mut out, &exponent);
        put_field(&mut out, &modulus);
        out
    }

    /// Render as a single `ssh-rsa` line, as found in `authorized_keys`
    pub fn to_openssh(&self, comment: &str) -> String {
        let blob = BASE64_STANDARD.encode(self.to_wire());
        if comment.is_empty() {
            format!("{} {}", RSA_ALGORITHM, blob)
        } else {
            format!("{} {} {}", RSA_ALGORITHM, blob, comment)
        }
    }

    /// OpenSSH style fingerprint: `SHA256:` followed by unpadded base64
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.to_wire());
        format!("SHA256:{}", BASE64_STANDARD_NO_PAD.encode(digest))
    }
}

impl From<RsaPublicKey> for PublicKeyMaterial {
    fn from(key: RsaPublicKey) -> Self {
        Self { key }
    }
}

/// An RSA private key loaded from local storage
#[derive(Clone)]
pub struct PrivateKeyMaterial {
    key: RsaPrivateKey,
}

impl PrivateKeyMaterial {
    pub fn public_key(&self) -> PublicKeyMaterial {
        PublicKeyMaterial::from(self.key.to_public_key())
    }

    /// Modulus length in bytes
    pub fn size(&self) -> usize {
        self.key.size()
    }

    pub(crate) fn as_rsa(&self) -> &RsaPrivateKey {
        &self.key
    }
}

impl From<RsaPrivateKey> for PrivateKeyMaterial {
    fn from(key: RsaPrivateKey) -> Self {
        Self { key }
    }
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyMaterial")
            .field("bits", &self.key.n().bits())
            .finish_non_exhaustive()
    }
}

/// Parse an OpenSSH RSA public key.
///
/// Accepts either a full `ssh-rsa <blob> [comment]` line or the bare base64
/// blob. Blank lines and `#` comment lines before the key are skipped.
pub fn parse_public_key(raw: &[u8]) -> Result<PublicKeyMaterial> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| SshboxError::InvalidKeyFormat("public key is not text".into()))?;
    let line = PublicKeyLine::tokenize(text)?;

    let blob = BASE64_STANDARD
        .decode(line.payload)
        .map_err(|e| SshboxError::InvalidKeyFormat(format!("couldn't decode public key: {}", e)))?;

    let mut reader = WireReader::new(&blob);
    let algorithm = reader.read_field("algorithm name")?;
    if algorithm != RSA_ALGORITHM.as_bytes() {
        return Err(SshboxError::UnsupportedAlgorithm(
            String::from_utf8_lossy(algorithm).into_owned(),
        ));
    }
    let exponent = reader.read_field("exponent")?;
    let modulus = reader.read_field("modulus")?;
    reader.finish()?;

    if let Some(label) = line.label {
        if label != RSA_ALGORITHM {
            return Err(SshboxError::InvalidKeyFormat(format!(
                "key is labelled {} but contains an {} key",
                label, RSA_ALGORITHM
            )));
        }
    }

    let key = PublicKeyMaterial::new(
        BigUint::from_bytes_be(modulus),
        BigUint::from_bytes_be(exponent),
    )?;
    debug!(
        bits = key.bits(),
        comment = line.comment.unwrap_or(""),
        "parsed public key"
    );
    Ok(key)
}

/// Parse a PEM-armored PKCS#1 RSA private key
pub fn parse_private_key(raw: &[u8]) -> Result<PrivateKeyMaterial> {
    let block = armor::decode(raw)
        .map_err(|e| SshboxError::InvalidKeyFormat(format!("couldn't decode key file: {}", e)))?;
    let der = Zeroizing::new(block.bytes);

    if block.label != PRIVATE_KEY_LABEL {
        return Err(SshboxError::InvalidKeyFormat(format!(
            "expected {}, found {}",
            PRIVATE_KEY_LABEL, block.label
        )));
    }

    let key = RsaPrivateKey::from_pkcs1_der(&der)
        .map_err(|e| SshboxError::InvalidKeyFormat(format!("bad PKCS#1 structure: {}", e)))?;
    key.validate()
        .map_err(|e| SshboxError::InvalidKeyFormat(format!("inconsistent RSA key: {}", e)))?;

    debug!(bits = key.n().bits(), "parsed private key");
    Ok(PrivateKeyMaterial { key })
}

/// The pieces of a public key line
struct PublicKeyLine<'a> {
    label: Option<&'a str>,
    payload: &'a str,
    comment: Option<&'a str>,
}

impl<'a> PublicKeyLine<'a> {
    fn tokenize(text: &'a str) -> Result<Self> {
        let line = text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
            .ok_or_else(|| SshboxError::InvalidKeyFormat("public key is empty".into()))?;

        let (first, rest) = split_token(line);
        let (label, payload, comment) = if is_base64_token(first) {
            (None, first, rest)
        } else {
            let (payload, comment) = split_token(rest);
            if payload.is_empty() {
                return Err(SshboxError::InvalidKeyFormat(format!(
                    "no key data after {}",
                    first
                )));
            }
            (Some(first), payload, comment)
        };

        Ok(Self {
            label,
            payload,
            comment: Some(comment).filter(|c| !c.is_empty()),
        })
    }
}

/// Split off the first whitespace-delimited token
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim()),
        None => (s, ""),
    }
}

fn is_base64_token(token: &str) -> bool {
    token
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
}

/// Reader over length-prefixed wire fields
struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn read_field(&mut self, name: &str) -> Result<&'a [u8]> {
        if self.buf.is_empty() {
            return Err(SshboxError::InvalidKeyFormat(format!("missing {}", name)));
        }
        if self.buf.len() < LENGTH_PREFIX_SIZE {
            return Err(SshboxError::InvalidKeyFormat(format!(
                "truncated length prefix for {}",
                name
            )));
        }

        let (prefix, rest) = self.buf.split_at(LENGTH_PREFIX_SIZE);
        let len = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        if len > rest.len() {
            return Err(SshboxError::InvalidKeyFormat(format!(
                "{} length {} exceeds the remaining {} bytes",
                name,
                len,
                rest.len()
            )));
        }

        let (field, rest) = rest.split_at(len);
        self.buf = rest;
        Ok(field)
    }

    fn finish(&self) -> Result<()> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(SshboxError::InvalidKeyFormat(format!(
                "{} trailing bytes after modulus",
                self.buf.len()
            )))
        }
    }
}

fn put_field(out: &mut Vec<u8>, field: &[u8]) {
    out.extend_from_slice(&(field.len() as u32).to_be_bytes());
    out.extend_from_slice(field);
}

/// SSH mpint: big-endian, with a leading zero when the top bit is set
fn mpint(n: &BigUint) -> Vec<u8> {
    let mut bytes = n.to_bytes_be();
    if bytes.first().is_some_and(|&b| b & 0x80 != 0) {
        bytes.insert(0, 0);
    }
    bytes
}
