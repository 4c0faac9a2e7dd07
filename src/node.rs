//! SoulSign Local Node
//!
//! Ties together the engine, the registration ledger and redb storage into a
//! single process that the CLI and the integration tests drive.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                    LocalNode                      │
//! ├──────────────────────────────────────────────────┤
//! │  ┌───────────────┐        ┌───────────────────┐  │
//! │  │ LedgerRuntime │───────▶│  FHEServer        │  │
//! │  │ (nonces, lock)│ verify │  (ciphertexts,    │  │
//! │  └──────┬────────┘ allow  │   ACL, decrypt)   │  │
//! │         │                 └─────────┬─────────┘  │
//! │  ┌──────▼────────┐        ┌─────────▼─────────┐  │
//! │  │  RedbJournal  │        │   EngineStore     │  │
//! │  │ (records,     │        │   (network key)   │  │
//! │  │  ciphertexts) │        └───────────────────┘  │
//! │  └───────────────┘                               │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! A committed write is one redb transaction holding the record, its event
//! and the sealed ciphertext. On open the engine starts empty and is refilled
//! by replaying the journal.

use soulsign_fhe::{Address, CiphertextHandle, FHEConfig, FHEServer, NetworkPublicKey, SignedDecryptRequest};
use soulsign_registry::{
    AuthorizedDecryption, EventRecord, Identity, LedgerRuntime, RegistrationLedger, RegistryError,
    SignedTransaction, TransactionReceipt,
};
use soulsign_storage::{LedgerMeta, RedbJournal, Storage, StorageError, StorageStats, DB_FILE_NAME};
use soulsign_wallet::{Keypair, Registrant};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::info;

use crate::config::DEFAULT_LEDGER_SALT;

/// Errors during node operation
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Data directory belongs to chain {stored}, configured chain is {configured}")]
    ChainMismatch { stored: u64, configured: u64 },
}

/// Result type for node operations
pub type NodeResult<T> = Result<T, NodeError>;

/// Node configuration
#[derive(Clone, Debug)]
pub struct NodeConfig {
    /// Directory holding the database
    pub data_dir: PathBuf,
    /// Chain id handles are bound to
    pub chain_id: u64,
    /// Upper bound on decryption request validity
    pub max_decrypt_duration_days: u32,
    /// Salt the ledger address is derived with on first open
    pub ledger_salt: String,
}

impl NodeConfig {
    /// Configuration for a local development node under `data_dir`
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            chain_id: soulsign_fhe::DEFAULT_CHAIN_ID,
            max_decrypt_duration_days: soulsign_fhe::MAX_DECRYPT_DURATION_DAYS,
            ledger_salt: DEFAULT_LEDGER_SALT.to_string(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    fn fhe_config(&self) -> FHEConfig {
        FHEConfig {
            chain_id: self.chain_id,
            max_decrypt_duration_days: self.max_decrypt_duration_days,
        }
    }
}

/// Single-process ledger node
pub struct LocalNode {
    storage: Storage,
    engine: Arc<FHEServer>,
    runtime: LedgerRuntime<FHEServer, RedbJournal>,
    decryption: AuthorizedDecryption<FHEServer>,
    meta: LedgerMeta,
}

impl LocalNode {
    /// Open the node stored under `config.data_dir`, creating it on first use
    pub fn open(config: &NodeConfig) -> NodeResult<Self> {
        let fhe_config = config.fhe_config();
        fhe_config
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))?;

        let storage = Storage::open(config.db_path())?;

        let meta = match storage.meta.get()? {
            Some(meta) => {
                if meta.chain_id != config.chain_id {
                    return Err(NodeError::ChainMismatch {
                        stored: meta.chain_id,
                        configured: config.chain_id,
                    });
                }
                meta
            }
            None => {
                let meta = LedgerMeta {
                    address: Address::derive_contract(&Address::ZERO, config.ledger_salt.as_bytes()),
                    chain_id: config.chain_id,
                    created_at: unix_now(),
                };
                storage.meta.save(&meta)?;
                info!(ledger = %meta.address, chain_id = meta.chain_id, "Initialized ledger");
                meta
            }
        };

        let engine = Arc::new(storage.engine.load_or_create(fhe_config)?);
        let ledger = RegistrationLedger::open(meta.address, engine.clone(), storage.journal())?;
        let runtime = LedgerRuntime::new(ledger);
        let decryption = AuthorizedDecryption::new(engine.clone(), meta.address);

        info!(
            ledger = %meta.address,
            registered = runtime.registered_count(),
            "Local node opened"
        );

        Ok(Self {
            storage,
            engine,
            runtime,
            decryption,
            meta,
        })
    }

    /// Ledger address
    pub fn address(&self) -> Address {
        self.meta.address
    }

    pub fn chain_id(&self) -> u64 {
        self.meta.chain_id
    }

    /// Key registrants seal their values to
    pub fn engine_public_key(&self) -> NetworkPublicKey {
        self.engine.public_key()
    }

    /// Client bound to this node's ledger and engine
    pub fn registrant(&self, keypair: Keypair) -> Registrant {
        Registrant::new(keypair, self.meta.address, self.engine.public_key(), self.meta.chain_id)
    }

    /// Apply a signed transaction; it is durable once this returns `Ok`
    pub fn submit(&self, tx: &SignedTransaction) -> NodeResult<TransactionReceipt> {
        Ok(self.runtime.submit(tx)?)
    }

    /// Stored handle for `subject`, or the empty sentinel
    pub fn get_encrypted(&self, subject: &Identity) -> CiphertextHandle {
        self.runtime.get_encrypted(subject)
    }

    pub fn is_registered(&self, subject: &Identity) -> bool {
        self.runtime.is_registered(subject)
    }

    /// Next nonce expected from `identity`
    pub fn nonce(&self, identity: &Identity) -> u64 {
        self.runtime.nonce(identity)
    }

    /// Decrypt `subject`'s value for the signer of `request`
    pub fn decrypt(&self, subject: &Identity, request: &SignedDecryptRequest, now: u64) -> NodeResult<Option<u32>> {
        Ok(self
            .decryption
            .decrypt_registered(&self.runtime, subject, request, now)?)
    }

    /// Events with sequence `>= from`
    pub fn events_since(&self, from: u64) -> Vec<EventRecord> {
        self.runtime.events_since(from)
    }

    pub fn registered_count(&self) -> usize {
        self.runtime.registered_count()
    }

    pub fn stats(&self) -> StorageStats {
        self.storage.stats()
    }
}

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
