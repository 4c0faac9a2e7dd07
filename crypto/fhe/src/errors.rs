//! FHE engine error types

use thiserror::Error;

/// Errors that can occur inside the encryption engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FHEError {
    /// Malformed account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed ciphertext handle
    #[error("Invalid ciphertext handle: {0}")]
    InvalidHandle(String),

    /// Input proof rejected
    #[error("Invalid input proof: {0}")]
    InvalidProof(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Requester may not decrypt this handle
    #[error("Decryption denied: {0}")]
    DecryptionDenied(String),

    /// Granter is not on the handle's access list
    #[error("Access denied: {account} is not allowed on {handle}")]
    AccessDenied { account: String, handle: String },

    /// Handle was never ingested by the engine
    #[error("Unknown ciphertext handle: {0}")]
    UnknownHandle(String),

    /// Invalid key material
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Too many values in one encrypted input
    #[error("Too many inputs: maximum {max}")]
    TooManyInputs { max: usize },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<bincode::Error> for FHEError {
    fn from(e: bincode::Error) -> Self {
        FHEError::SerializationError(e.to_string())
    }
}
