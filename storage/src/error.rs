//! Errors raised by the redb-backed stores

use soulsign_registry::RegistryError;
use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Journal entry or meta row failed to (de)serialize
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored value has the wrong shape, e.g. a truncated network secret
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Stored state contradicts the ledger's single-write rules
    #[error("Data corruption detected: {0}")]
    Corruption(String),
}

impl From<bincode::Error> for StorageError {
    fn from(e: bincode::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

// Journal failures surface to the ledger as a rejected write
impl From<StorageError> for RegistryError {
    fn from(e: StorageError) -> Self {
        RegistryError::Journal(e.to_string())
    }
}
