//! Wallet errors

use thiserror::Error;

/// Wallet result type
pub type WalletResult<T> = Result<T, WalletError>;

/// Wallet errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Keystore not found: {0}")]
    NotFound(String),

    #[error("Keystore already exists: {0}")]
    AlreadyExists(String),

    #[error("Keystore does not match its identity")]
    IdentityMismatch,

    #[error("Encryption failed: {0}")]
    Encryption(#[from] soulsign_fhe::FHEError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] soulsign_registry::RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
