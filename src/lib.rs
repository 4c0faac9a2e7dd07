//! SoulSign: Confidential Birth-Date Registry
//!
//! This is the root crate that re-exports all SoulSign components for
//! integration testing and wires them into a runnable local node.
//!
//! ## Architecture Overview
//!
//! A registrant seals a birth date to the engine's network key, submits the
//! resulting handle and input proof to the registration ledger, and later
//! recovers the value through a signed decryption request. The ledger stores
//! handles only:
//!
//! - **Single write**: one record per identity, never updated
//! - **Content-blind reads**: anyone can read a handle, nobody learns the value
//! - **Authorized decryption**: owner or delegated viewers only
//!
//! ## Crate Organization
//!
//! - `soulsign-fhe`: reference encryption engine (sealing, proofs, ACL, decryption)
//! - `soulsign-registry`: registration ledger, transactions, runtime
//! - `soulsign-storage`: redb journal and engine persistence
//! - `soulsign-wallet`: registrant keys, keystore, request building
//! - `soulsign-astro`: readings derived from a decrypted date

pub mod node;

// Re-export all crates for integration testing
pub use soulsign_astro as astro;
pub use soulsign_fhe as fhe;
pub use soulsign_registry as registry;
pub use soulsign_storage as storage;
pub use soulsign_wallet as wallet;

/// SoulSign version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Network defaults
pub mod config {
    /// Salt the ledger address is derived with
    pub const DEFAULT_LEDGER_SALT: &str = "soulsign-ledger-v1";

    /// Default validity of a user decryption request
    pub const DEFAULT_DECRYPT_VALIDITY_DAYS: u32 = 1;

    pub use soulsign_fhe::{DEFAULT_CHAIN_ID, MAX_DECRYPT_DURATION_DAYS};
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::node::{unix_now, LocalNode, NodeConfig, NodeError, NodeResult};
    pub use soulsign_astro::{BirthDate, Reading, ZodiacSign};
    pub use soulsign_fhe::{Address, CiphertextHandle, FHEServer, SignedDecryptRequest};
    pub use soulsign_registry::{Identity, RegistryError, RegistryEvent, TransactionReceipt};
    pub use soulsign_wallet::{Keypair, Registrant};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_validity_within_limit() {
        assert!(config::DEFAULT_DECRYPT_VALIDITY_DAYS <= config::MAX_DECRYPT_DURATION_DAYS);
    }
}
