use crate::cli::output::write_output;
use crate::error::Result;
use crate::key::parse_public_key;
use crate::source::{fetch_key, KeyLocation};
use std::path::Path;
use tracing::info;

/// Options for the encrypt command
#[derive(Debug, Clone, Default)]
pub struct EncryptOptions {
    /// Path or http(s) URL of the recipient's `ssh-rsa` public key
    pub key: String,
    /// Wrap the container in an `SSHBOX ENCRYPTED FILE` armor block
    pub armor: bool,
}

/// Encrypt a file to a public key.
/// Returns the size of the written container.
pub fn encrypt_file(input_path: &Path, output_path: &Path, options: &EncryptOptions) -> Result<usize> {
    let location = KeyLocation::parse(&options.key);
    let public = parse_public_key(&fetch_key(&location)?)?;
    info!(
        fingerprint = %public.fingerprint(),
        bits = public.bits(),
        "encrypting to public key"
    );

    let message = std::fs::read(input_path)?;
    let encoded = crate::encrypt(&message, &public, options.armor)?;

    // Nothing touches the output until the whole pipeline has succeeded
    write_output(output_path, &encoded)?;
    Ok(encoded.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{decode_detect, Format};
    use crate::error::SshboxError;
    use crate::test_support::public_key;
    use tempfile::tempdir;

    #[test]
    fn test_encrypt_file_binary_and_armored() {
        let dir = tempdir().unwrap();
        let key_path = dir.path().join("id_rsa.pub");
        let input = dir.path().join("input.txt");
        std::fs::write(&key_path, public_key().to_openssh("test@sshbox")).unwrap();
        std::fs::write(&input, b"hello world").unwrap();

        for (armor, format) in [(false, Format::Binary), (true, Format::Armored)] {
            let output = dir.path().join(format!("output-{}.box", format));
            let options = EncryptOptions {
                key: key_path.to_str().unwrap().into(),
                armor,
            };
            let written = encrypt_file(&input, &output, &options).unwrap();

            let data = std::fs::read(&output).unwrap();
            assert_eq!(written, data.len());
            let (container, detected) = decode_detect(&data).unwrap();
            assert_eq!(detected, format);
            assert_eq!(container.locked_key().len(), 256);
        }
    }

    #[test]
    fn test_encrypt_file_bad_key_leaves_no_output() {
        let dir = tempdir().unwrap();
        let key_path = dir.path().join("id_ed25519.pub");
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.box");
        std::fs::write(
            &key_path,
            "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJl me@host",
        )
        .unwrap();
        std::fs::write(&input, b"hello world").unwrap();

        let options = EncryptOptions {
            key: key_path.to_str().unwrap().into(),
            armor: false,
        };
        let result = encrypt_file(&input, &output, &options);
        assert!(matches!(result, Err(SshboxError::UnsupportedAlgorithm(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_encrypt_file_missing_input() {
        let dir = tempdir().unwrap();
        let key_path = dir.path().join("id_rsa.pub");
        std::fs::write(&key_path, public_key().to_openssh("")).unwrap();
        let output = dir.path().join("output.box");

        let options = EncryptOptions {
            key: key_path.to_str().unwrap().into(),
            armor: false,
        };
        let result = encrypt_file(&dir.path().join("absent.txt"), &output, &options);
        assert!(matches!(result, Err(SshboxError::Io(_))));
        assert!(!output.exists());
    }
}
