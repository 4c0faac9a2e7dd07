//! SoulSign Storage Layer
//!
//! Provides persistent storage for a registration ledger and its engine.
//!
//! One redb file holds:
//! - The registry journal, keyed by event sequence
//! - Registered records, keyed by owner
//! - Ledger metadata (address, chain id)
//! - Engine network key

pub mod engine;
pub mod journal;
pub mod meta;
mod error;

pub use engine::EngineStore;
pub use error::{StorageError, StorageResult};
pub use journal::RedbJournal;
pub use meta::{LedgerMeta, MetaStore};

use redb::Database;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Default database file name inside a data directory
pub const DB_FILE_NAME: &str = "soulsign.redb";

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Database path
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./soulsign_data").join(DB_FILE_NAME),
        }
    }
}

/// Handles to every table in one database file
pub struct Storage {
    config: StorageConfig,
    journal: RedbJournal,
    pub meta: MetaStore,
    pub engine: EngineStore,
}

impl Storage {
    /// Open or create storage at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let config = StorageConfig {
            path: path.as_ref().to_path_buf(),
        };
        Self::with_config(config)
    }

    /// Open storage with custom configuration
    pub fn with_config(config: StorageConfig) -> StorageResult<Self> {
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Arc::new(Database::create(&config.path)?);

        let journal = RedbJournal::new(db.clone())?;
        let meta = MetaStore::new(db.clone())?;
        let engine = EngineStore::new(db)?;

        debug!(path = %config.path.display(), "Storage opened");

        Ok(Self {
            config,
            journal,
            meta,
            engine,
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Journal handle to give to a ledger
    pub fn journal(&self) -> RedbJournal {
        self.journal.clone()
    }

    /// Row counts; zero if a table cannot be read
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            path: self.config.path.clone(),
            journal_entries: self.journal.entry_count().unwrap_or(0),
            records: self.journal.record_count().unwrap_or(0),
        }
    }
}

/// Storage statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub path: PathBuf,
    pub journal_entries: u64,
    pub records: u64,
}
