use thiserror::Error;

#[derive(Error, Debug)]
pub enum SshboxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The random source could not produce a box key or nonce.
    #[error("Failed to generate the box key")]
    KeyGenerationFailure,

    #[error("Encryption failed: {0}")]
    EncryptionFailure(String),

    /// The locked key could not be recovered with the private key.
    /// Intentionally vague.
    #[error("Invalid key: failed to recover the box key")]
    InvalidKey,

    /// The box did not authenticate under the recovered key.
    #[error("Authentication failed: the box has been modified or the key is wrong")]
    AuthenticationFailure,

    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    #[error("Key source error: {0}")]
    KeySource(String),
}

pub type Result<T> = std::result::Result<T, SshboxError>;
