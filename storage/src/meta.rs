//! Ledger metadata storage

use crate::StorageResult;
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use soulsign_fhe::Address;
use std::sync::Arc;

/// Table for ledger metadata
const LEDGER_META: TableDefinition<&str, &[u8]> = TableDefinition::new("ledger_meta");

const META_KEY: &str = "ledger_meta";

/// Identity of the ledger a database belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMeta {
    /// Ledger address
    pub address: Address,
    /// Chain id handles are bound to
    pub chain_id: u64,
    /// Creation time, unix seconds
    pub created_at: u64,
}

/// Metadata storage interface
pub struct MetaStore {
    db: Arc<Database>,
}

impl MetaStore {
    /// Create new meta store
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LEDGER_META)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Save ledger metadata
    pub fn save(&self, meta: &LedgerMeta) -> StorageResult<()> {
        let encoded = bincode::serialize(meta)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LEDGER_META)?;
            table.insert(META_KEY, encoded.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    /// Get ledger metadata
    pub fn get(&self) -> StorageResult<Option<LedgerMeta>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LEDGER_META)?;

        let result = match table.get(META_KEY)? {
            Some(data) => Some(bincode::deserialize(data.value())?),
            None => None,
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_meta_roundtrip() {
        let dir = tempdir().unwrap();
        let db = Arc::new(Database::create(dir.path().join("meta.db")).unwrap());
        let store = MetaStore::new(db).unwrap();

        assert!(store.get().unwrap().is_none());

        let meta = LedgerMeta {
            address: Address::from_bytes([4u8; 20]),
            chain_id: 31337,
            created_at: 1_700_000_000,
        };
        store.save(&meta).unwrap();
        assert_eq!(store.get().unwrap(), Some(meta));
    }
}
