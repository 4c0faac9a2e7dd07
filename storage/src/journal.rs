//! Registry journal storage
//!
//! Entries are keyed by event sequence. Registered records are mirrored in a
//! second table keyed by owner so a single identity can be read without a
//! replay. Both tables change in the same write transaction, and a
//! registration entry carries the engine's ciphertext export, so a committed
//! record is never without its ciphertext.

use crate::{StorageError, StorageResult};
use redb::{Database, ReadableTable, TableDefinition};
use soulsign_registry::{EncryptedRecord, Identity, JournalEntry, RegistryJournal, RegistryResult};
use std::sync::Arc;
use tracing::debug;

/// Journal entries by sequence
const JOURNAL: TableDefinition<u64, &[u8]> = TableDefinition::new("registry_journal");

/// Records by owner address
const RECORDS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("registry_records");

/// redb-backed registry journal
#[derive(Clone)]
pub struct RedbJournal {
    db: Arc<Database>,
}

impl RedbJournal {
    /// Create journal tables if missing
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(JOURNAL)?;
            let _ = write_txn.open_table(RECORDS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Store one entry and its record atomically
    pub fn put(&self, entry: &JournalEntry) -> StorageResult<()> {
        let encoded = bincode::serialize(entry)?;
        let sequence = entry.event.sequence;

        let write_txn = self.db.begin_write()?;
        {
            let mut journal = write_txn.open_table(JOURNAL)?;
            if journal.get(sequence)?.is_some() {
                return Err(StorageError::Corruption(format!("Sequence {sequence} already written")));
            }

            if let Some(record) = &entry.record {
                let mut records = write_txn.open_table(RECORDS)?;
                let key = record.owner.as_bytes().as_slice();
                if records.get(key)?.is_some() {
                    return Err(StorageError::Corruption(format!(
                        "Record for {} already written",
                        record.owner
                    )));
                }
                let record_bytes = bincode::serialize(record)?;
                records.insert(key, record_bytes.as_slice())?;
            }

            journal.insert(sequence, encoded.as_slice())?;
        }
        write_txn.commit()?;

        debug!(sequence, "Journal entry committed");
        Ok(())
    }

    /// All entries in sequence order
    pub fn entries(&self) -> StorageResult<Vec<JournalEntry>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(JOURNAL)?;
        let bytes_list: Vec<Vec<u8>> = table
            .iter()?
            .map(|r| r.map(|(_, data)| data.value().to_vec()))
            .collect::<Result<_, _>>()?;
        drop(table);
        drop(read_txn);

        let mut entries = Vec::with_capacity(bytes_list.len());
        for bytes in bytes_list {
            entries.push(bincode::deserialize(&bytes)?);
        }
        Ok(entries)
    }

    /// Stored record for `owner`
    pub fn record(&self, owner: &Identity) -> StorageResult<Option<EncryptedRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS)?;

        let result = match table.get(owner.as_bytes().as_slice())? {
            Some(data) => Some(bincode::deserialize(data.value())?),
            None => None,
        };

        Ok(result)
    }

    /// Number of journal entries
    pub fn entry_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(JOURNAL)?;
        Ok(table.len()?)
    }

    /// Number of registered identities
    pub fn record_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS)?;
        Ok(table.len()?)
    }
}

impl RegistryJournal for RedbJournal {
    fn append(&mut self, entry: &JournalEntry) -> RegistryResult<()> {
        Ok(self.put(entry)?)
    }

    fn replay(&self) -> RegistryResult<Vec<JournalEntry>> {
        Ok(self.entries()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulsign_fhe::{Address, CiphertextHandle};
    use soulsign_registry::{EventRecord, RegistryEvent};
    use tempfile::tempdir;

    fn entry(sequence: u64, identity: Identity) -> JournalEntry {
        JournalEntry {
            record: Some(EncryptedRecord::new(identity, CiphertextHandle::from_bytes([7u8; 32]))),
            sealed: Some(vec![0xc7; 64]),
            event: EventRecord {
                sequence,
                ledger: Address::from_bytes([1u8; 20]),
                event: RegistryEvent::BirthRegistered { identity },
            },
        }
    }

    fn open_journal(dir: &std::path::Path) -> RedbJournal {
        let db = Arc::new(Database::create(dir.join("journal.db")).unwrap());
        RedbJournal::new(db).unwrap()
    }

    #[test]
    fn test_put_and_replay() {
        let dir = tempdir().unwrap();
        let journal = open_journal(dir.path());

        let alice = Address::from_bytes([0xa1; 20]);
        let bob = Address::from_bytes([0xb0; 20]);
        journal.put(&entry(0, alice)).unwrap();
        journal.put(&entry(1, bob)).unwrap();

        let entries = journal.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event.sequence, 0);
        assert_eq!(entries[1].event.sequence, 1);
        assert_eq!(journal.record(&alice).unwrap().unwrap().owner, alice);
        assert!(journal.record(&Address::from_bytes([0x99; 20])).unwrap().is_none());
        assert_eq!(journal.record_count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_record_rejected_atomically() {
        let dir = tempdir().unwrap();
        let journal = open_journal(dir.path());
        let alice = Address::from_bytes([0xa1; 20]);

        journal.put(&entry(0, alice)).unwrap();
        assert!(matches!(journal.put(&entry(1, alice)), Err(StorageError::Corruption(_))));
        assert_eq!(journal.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempdir().unwrap();
        let alice = Address::from_bytes([0xa1; 20]);
        {
            let journal = open_journal(dir.path());
            journal.put(&entry(0, alice)).unwrap();
        }

        let journal = open_journal(dir.path());
        let entries = journal.replay().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sealed.as_deref(), Some(&[0xc7; 64][..]));
    }
}
