//! Durable log behind a ledger
//!
//! Every committed write is one journal entry. A registration entry carries
//! the engine's export of the ciphertext it references, so record and
//! ciphertext are persisted together. A ledger and its engine state are
//! rebuilt by replaying entries in order.

use crate::event::EventRecord;
use crate::record::EncryptedRecord;
use crate::RegistryResult;
use serde::{Deserialize, Serialize};

/// One committed write
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Record created by the write, if any
    pub record: Option<EncryptedRecord>,
    /// Engine export of the record's ciphertext; present with `record`
    pub sealed: Option<Vec<u8>>,
    /// Event emitted by the write
    pub event: EventRecord,
}

/// Append-only store for journal entries
pub trait RegistryJournal: Send + Sync {
    /// Persist one entry. Either the whole entry is stored or nothing is.
    fn append(&mut self, entry: &JournalEntry) -> RegistryResult<()>;

    /// All entries in commit order
    fn replay(&self) -> RegistryResult<Vec<JournalEntry>>;
}

/// Journal held in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryJournal {
    entries: Vec<JournalEntry>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RegistryJournal for MemoryJournal {
    fn append(&mut self, entry: &JournalEntry) -> RegistryResult<()> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn replay(&self) -> RegistryResult<Vec<JournalEntry>> {
        Ok(self.entries.clone())
    }
}

/// Journal that accepts a fixed number of entries, then fails every append
#[cfg(test)]
pub(crate) struct FailingJournal {
    pub(crate) inner: MemoryJournal,
    pub(crate) accept: usize,
}

#[cfg(test)]
impl RegistryJournal for FailingJournal {
    fn append(&mut self, entry: &JournalEntry) -> RegistryResult<()> {
        if self.inner.len() >= self.accept {
            return Err(crate::RegistryError::Journal("disk full".into()));
        }
        self.inner.append(entry)
    }

    fn replay(&self) -> RegistryResult<Vec<JournalEntry>> {
        self.inner.replay()
    }
}
