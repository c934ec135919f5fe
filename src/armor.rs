//! PEM-style text armor.
//!
//! An armored block is a `-----BEGIN <label>-----` line, the payload as
//! standard base64 wrapped at [`LINE_WIDTH`] columns, and a matching
//! `-----END <label>-----` line. Both private keys and armored containers
//! travel in this envelope.

use base64::prelude::*;
use thiserror::Error;

/// Column at which the base64 body is wrapped
pub const LINE_WIDTH: usize = 64;

const BEGIN_PREFIX: &str = "-----BEGIN ";
const END_PREFIX: &str = "-----END ";
const MARKER_SUFFIX: &str = "-----";

/// Reasons an armored block could not be read
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArmorError {
    #[error("no BEGIN marker found")]
    MissingBegin,

    #[error("no END marker found for {0}")]
    MissingEnd(String),

    #[error("armor headers are not supported")]
    Headers,

    #[error("armor body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A decoded armor block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Armor {
    pub label: String,
    pub bytes: Vec<u8>,
}

/// Wrap `bytes` in an armor block carrying `label`
pub fn encode(label: &str, bytes: &[u8]) -> String {
    let body = BASE64_STANDARD.encode(bytes);
    let lines = body.len().div_ceil(LINE_WIDTH);
    let mut out = String::with_capacity(body.len() + lines + 2 * (label.len() + 16));

    out.push_str(BEGIN_PREFIX);
    out.push_str(label);
    out.push_str(MARKER_SUFFIX);
    out.push('\n');
    for chunk in body.as_bytes().chunks(LINE_WIDTH) {
        out.extend(chunk.iter().map(|&b| b as char));
        out.push('\n');
    }
    out.push_str(END_PREFIX);
    out.push_str(label);
    out.push_str(MARKER_SUFFIX);
    out.push('\n');
    out
}

/// Find and decode the first armor block in `data`.
///
/// Text before the BEGIN line is skipped. The END line must carry the same
/// label as the BEGIN line.
pub fn decode(data: &[u8]) -> Result<Armor, ArmorError> {
    let text = String::from_utf8_lossy(data);
    let mut lines = text.lines().map(str::trim);

    let label = lines
        .by_ref()
        .find_map(begin_label)
        .ok_or(ArmorError::MissingBegin)?
        .to_string();
    let end = format!("{END_PREFIX}{label}{MARKER_SUFFIX}");

    let mut body = String::new();
    let mut closed = false;
    for line in lines {
        if line == end {
            closed = true;
            break;
        }
        if line.contains(':') {
            return Err(ArmorError::Headers);
        }
        body.push_str(line);
    }
    if !closed {
        return Err(ArmorError::MissingEnd(label));
    }

    let bytes = BASE64_STANDARD.decode(body.as_bytes())?;
    Ok(Armor { label, bytes })
}

fn begin_label(line: &str) -> Option<&str> {
    line.strip_prefix(BEGIN_PREFIX)?
        .strip_suffix(MARKER_SUFFIX)
        .filter(|label| !label.is_empty())
}
