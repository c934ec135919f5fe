use crate::cipher::BOX_OVERHEAD;
use crate::container::{decode_detect, Format};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// What can be learned about a container without any key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub format: Format,
    pub file_size: usize,
    pub locked_key_bytes: usize,
    /// RSA modulus size implied by the locked key length
    pub modulus_bits: usize,
    pub box_bytes: usize,
    /// `None` when the box is too short to hold a nonce and tag
    pub message_bytes: Option<usize>,
}

/// Inspect container bytes
pub fn inspect(data: &[u8]) -> Result<ContainerInfo> {
    let (container, format) = decode_detect(data)?;
    Ok(ContainerInfo {
        format,
        file_size: data.len(),
        locked_key_bytes: container.locked_key().len(),
        modulus_bits: container.locked_key().len() * 8,
        box_bytes: container.sealed_box().len(),
        message_bytes: container.sealed_box().len().checked_sub(BOX_OVERHEAD),
    })
}

/// Display information about a container file
pub fn show_info(path: &Path, json: bool) -> Result<String> {
    let data = std::fs::read(path)?;
    let info = inspect(&data)?;

    if json {
        let mut output = serde_json::to_string_pretty(&info)?;
        output.push('\n');
        return Ok(output);
    }

    let mut output = String::new();

    output.push_str("SSHBOX Container Information\n");
    output.push_str("============================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Format: {}\n", info.format));
    output.push_str(&format!("Size: {}\n", format_size(info.file_size as u64)));
    output.push('\n');

    output.push_str("Locked key:\n");
    output.push_str(&format!("  Length: {} bytes\n", info.locked_key_bytes));
    output.push_str(&format!("  RSA modulus: {} bits\n", info.modulus_bits));
    output.push_str("  Wrapping: RSA-OAEP with SHA-256\n");
    output.push('\n');

    output.push_str("Box:\n");
    output.push_str(&format!("  Length: {} bytes\n", info.box_bytes));
    output.push_str("  Cipher: AES-256-GCM\n");
    match info.message_bytes {
        Some(len) => output.push_str(&format!("  Message size: {}\n", format_size(len as u64))),
        None => output.push_str("  Message size: invalid (box shorter than nonce and tag)\n"),
    }

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
