//! Error types for registry operations

use crate::Identity;
use soulsign_fhe::FHEError;
use thiserror::Error;

/// Errors that can occur during registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Already registered: {0}")]
    AlreadyRegistered(Identity),

    #[error("Invalid input proof: {0}")]
    InvalidProof(String),

    #[error("Decryption denied: {0}")]
    DecryptionDenied(String),

    #[error("No registered value for {0}")]
    NoRecord(Identity),

    #[error("Invalid transaction signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: u64, got: u64 },

    #[error("Transaction addressed to {got}, this ledger is {expected}")]
    WrongLedger { expected: Identity, got: Identity },

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Journal error: {0}")]
    Journal(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<FHEError> for RegistryError {
    fn from(err: FHEError) -> Self {
        match err {
            FHEError::InvalidProof(msg) | FHEError::InvalidHandle(msg) => RegistryError::InvalidProof(msg),
            FHEError::DecryptionDenied(msg) => RegistryError::DecryptionDenied(msg),
            other => RegistryError::Engine(other.to_string()),
        }
    }
}

impl From<bincode::Error> for RegistryError {
    fn from(err: bincode::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}
