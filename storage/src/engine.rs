//! Engine key storage
//!
//! Holds the engine's network secret. Ciphertexts and permissions are not
//! stored here: they travel in the registry journal and are restored when the
//! ledger replays it.

use crate::{StorageError, StorageResult};
use redb::{Database, ReadableTable, TableDefinition};
use soulsign_fhe::{FHEConfig, FHEServer, NetworkKeyPair};
use std::sync::Arc;
use tracing::info;

const ENGINE_STATE: TableDefinition<&str, &[u8]> = TableDefinition::new("engine_state");

const SECRET_KEY: &str = "network_secret";

/// Engine key storage interface
pub struct EngineStore {
    db: Arc<Database>,
}

impl EngineStore {
    /// Create new engine store
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ENGINE_STATE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Persist the network key
    pub fn save_keys(&self, keys: &NetworkKeyPair) -> StorageResult<()> {
        let secret = keys.secret_bytes();

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ENGINE_STATE)?;
            table.insert(SECRET_KEY, secret.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    /// Load the network key
    pub fn load_keys(&self) -> StorageResult<Option<NetworkKeyPair>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ENGINE_STATE)?;

        let result = match table.get(SECRET_KEY)? {
            Some(data) => {
                let bytes: [u8; 32] = data
                    .value()
                    .try_into()
                    .map_err(|_| StorageError::InvalidData("Invalid network secret length".into()))?;
                Some(NetworkKeyPair::from_secret_bytes(bytes))
            }
            None => None,
        };

        Ok(result)
    }

    /// Engine around the stored key, or a fresh key on first use.
    ///
    /// The engine starts without ciphertexts; opening a ledger over the
    /// journal fills it.
    pub fn load_or_create(&self, config: FHEConfig) -> StorageResult<FHEServer> {
        match self.load_keys()? {
            Some(keys) => Ok(FHEServer::new(keys, config)),
            None => {
                let server = FHEServer::generate(config);
                self.save_keys(server.keys())?;
                info!("Generated engine network key");
                Ok(server)
            }
        }
    }
}
