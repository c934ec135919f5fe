//! Sealed container codec.
//!
//! A container is the DER encoding of
//!
//! ```text
//! BoxPackage ::= SEQUENCE {
//!     lockedKey  OCTET STRING,
//!     box        OCTET STRING
//! }
//! ```
//!
//! optionally wrapped in an `SSHBOX ENCRYPTED FILE` armor block. Decoding
//! needs no hint: the binary form is tried first, then the armored form.

use crate::armor::{self, ArmorError};
use crate::error::{Result, SshboxError};
use der::asn1::OctetString;
use der::{Decode, Encode, Sequence};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Label carried by both marker lines of an armored container
pub const ARMOR_LABEL: &str = "SSHBOX ENCRYPTED FILE";

/// The locked box key and the box, in that order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedContainer {
    locked_key: Vec<u8>,
    sealed_box: Vec<u8>,
}

impl SealedContainer {
    pub fn new(locked_key: Vec<u8>, sealed_box: Vec<u8>) -> Self {
        Self {
            locked_key,
            sealed_box,
        }
    }

    pub fn locked_key(&self) -> &[u8] {
        &self.locked_key
    }

    pub fn sealed_box(&self) -> &[u8] {
        &self.sealed_box
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.locked_key, self.sealed_box)
    }
}

/// Container encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Binary,
    Armored,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Binary => f.write_str("binary"),
            Format::Armored => f.write_str("armored"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Sequence)]
struct BoxPackage {
    locked_key: OctetString,
    sealed_box: OctetString,
}

/// Why a single decode attempt failed
#[derive(Debug, Error)]
enum AttemptError {
    #[error("{0}")]
    Der(#[from] der::Error),

    #[error("{0}")]
    Armor(#[from] ArmorError),

    #[error("unexpected armor label {0:?}")]
    Label(String),
}

type Attempt = fn(&[u8]) -> std::result::Result<SealedContainer, AttemptError>;

/// Decode attempts in the order they are tried. Binary goes first since a
/// DER parser rejects text after inspecting a single byte.
const ATTEMPTS: [(Format, Attempt); 2] = [
    (Format::Binary, decode_binary),
    (Format::Armored, decode_armored),
];

/// Serialize a container, armored or not
pub fn encode(container: &SealedContainer, armored: bool) -> Result<Vec<u8>> {
    let package = BoxPackage {
        locked_key: octet_string(&container.locked_key)?,
        sealed_box: octet_string(&container.sealed_box)?,
    };
    let der = package
        .to_der()
        .map_err(|e| SshboxError::InvalidContainer(format!("couldn't package the box: {}", e)))?;

    if armored {
        Ok(armor::encode(ARMOR_LABEL, &der).into_bytes())
    } else {
        Ok(der)
    }
}

/// Deserialize a container in either encoding
pub fn decode(data: &[u8]) -> Result<SealedContainer> {
    decode_detect(data).map(|(container, _)| container)
}

/// Deserialize a container and report which encoding it used
pub fn decode_detect(data: &[u8]) -> Result<(SealedContainer, Format)> {
    let mut failures = Vec::with_capacity(ATTEMPTS.len());
    for (format, attempt) in ATTEMPTS {
        match attempt(data) {
            Ok(container) => {
                debug!(%format, "decoded container");
                return Ok((container, format));
            }
            Err(e) => failures.push(format!("{}: {}", format, e)),
        }
    }
    Err(SshboxError::InvalidContainer(failures.join("; ")))
}

fn octet_string(bytes: &[u8]) -> Result<OctetString> {
    OctetString::new(bytes)
        .map_err(|e| SshboxError::InvalidContainer(format!("field too large: {}", e)))
}

fn decode_binary(data: &[u8]) -> std::result::Result<SealedContainer, AttemptError> {
    let package = BoxPackage::from_der(data)?;
    Ok(SealedContainer::new(
        package.locked_key.into_bytes(),
        package.sealed_box.into_bytes(),
    ))
}

fn decode_armored(data: &[u8]) -> std::result::Result<SealedContainer, AttemptError> {
    let block = armor::decode(data)?;
    if block.label != ARMOR_LABEL {
        return Err(AttemptError::Label(block.label));
    }
    decode_binary(&block.bytes)
}
