use crate::cipher::open;
use crate::cli::output::write_output;
use crate::container::decode;
use crate::error::{Result, SshboxError};
use crate::key::parse_private_key;
use crate::source::{fetch_key, KeyLocation};
use std::path::Path;
use tracing::warn;
use zeroize::Zeroizing;

/// Options for the decrypt command
#[derive(Debug, Clone, Default)]
pub struct DecryptOptions {
    /// Path of the PEM `RSA PRIVATE KEY`; must be local
    pub key: String,
}

/// Decrypt a binary or armored container.
/// Returns the size of the recovered message.
pub fn decrypt_file(input_path: &Path, output_path: &Path, options: &DecryptOptions) -> Result<usize> {
    let location = KeyLocation::parse(&options.key);
    if location.is_remote() {
        warn!(%location, "refusing to fetch a private key remotely");
        return Err(SshboxError::KeySource(
            "remotely fetching private keys is not allowed".into(),
        ));
    }

    let data = std::fs::read(input_path)?;
    let sealed = decode(&data)?;

    let key_bytes = Zeroizing::new(fetch_key(&location)?);
    let private = parse_private_key(&key_bytes)?;
    let message = Zeroizing::new(open(sealed, &private)?);

    write_output(output_path, &message)?;
    Ok(message.len())
}
