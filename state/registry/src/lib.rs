//! SoulSign Registration Ledger
//!
//! Each identity may write exactly one encrypted value, once. Anyone may read
//! the stored handle; only accounts the engine authorized can decrypt it.
//!
//! # Key Features:
//! - Single-write records keyed by the authenticated sender
//! - Content-blind reads returning handles or the empty sentinel
//! - Owner-controlled viewer delegation
//! - Signed transactions with per-sender nonces
//! - Journal trait so records can outlive the process

pub mod decryption;
pub mod errors;
pub mod event;
pub mod journal;
pub mod ledger;
pub mod record;
pub mod runtime;
pub mod transaction;

pub use decryption::AuthorizedDecryption;
pub use errors::RegistryError;
pub use event::{EventRecord, RegistryEvent, BIRTH_REGISTERED_SIGNATURE, VIEWER_ALLOWED_SIGNATURE};
pub use journal::{JournalEntry, MemoryJournal, RegistryJournal};
pub use ledger::RegistrationLedger;
pub use record::EncryptedRecord;
pub use runtime::LedgerRuntime;
pub use transaction::{Call, SignedTransaction, Transaction, TransactionLog, TransactionReceipt};

use soulsign_fhe::Address;

/// Identity of a registrant: the address of its signing key
pub type Identity = Address;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
