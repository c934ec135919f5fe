//! Key retrieval from local files or over HTTP(S).

use crate::error::{Result, SshboxError};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Largest key blob that will be read
pub const MAX_KEY_BYTES: u64 = 1024 * 1024;

/// How long a remote fetch may take before it is abandoned
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a key lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLocation {
    Local(PathBuf),
    Remote(String),
}

impl KeyLocation {
    /// Names starting with `http://` or `https://` are remote, anything else
    /// is a path
    pub fn parse(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Remote(name.to_string())
        } else {
            Self::Local(PathBuf::from(name))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for KeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// Fetch the raw bytes of a key. Failures are not retried.
pub fn fetch_key(location: &KeyLocation) -> Result<Vec<u8>> {
    let bytes = match location {
        KeyLocation::Local(path) => read_local(path)?,
        KeyLocation::Remote(url) => {
            info!(%url, "fetching key");
            fetch_remote(url)?
        }
    };
    debug!(%location, len = bytes.len(), "loaded key");
    Ok(bytes)
}

fn read_local(path: &Path) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path)
        .map_err(|e| SshboxError::KeySource(format!("{}: {}", path.display(), e)))?;
    read_bounded(file, &path.display().to_string())
}

fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| SshboxError::KeySource(format!("failed to set up HTTP client: {}", e)))?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| SshboxError::KeySource(format!("failed to fetch key: {}", e)))?;

    if response.content_length().is_some_and(|len| len > MAX_KEY_BYTES) {
        return Err(too_large(url));
    }
    read_bounded(response, url)
}

/// Read at most [`MAX_KEY_BYTES`], failing rather than truncating
fn read_bounded<R: Read>(reader: R, name: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(MAX_KEY_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| SshboxError::KeySource(format!("{}: {}", name, e)))?;
    if bytes.len() as u64 > MAX_KEY_BYTES {
        return Err(too_large(name));
    }
    Ok(bytes)
}

fn too_large(name: &str) -> SshboxError {
    SshboxError::KeySource(format!(
        "{}: key is larger than {} bytes",
        name, MAX_KEY_BYTES
    ))
}
