//! SoulSign Encryption Engine
//!
//! Reference implementation of the confidential-compute engine the registry
//! relies on. The registry stores and returns handles; only this engine can
//! resolve a handle to a value.
//!
//! # Key Features:
//! - Client-side sealing of 32-bit values to the engine's network key
//! - Proof-carrying inputs bound to (submitter, contract, chain)
//! - Per-handle access control lists
//! - Signed, time-boxed user decryption requests
//!
//! # Architecture:
//! - NetworkKeyPair: X25519 key held by the engine
//! - EncryptedInputBuilder: client side, produces handles + input proof
//! - FHEServer: verifies inputs, keeps ciphertexts and ACL, decrypts for
//!   authorized users
//! - InputVerifier / AccessControl / UserDecryptor: the seams a ledger uses

pub mod acl;
pub mod address;
pub mod ciphertext;
pub mod decrypt;
pub mod engine;
pub mod errors;
pub mod handle;
pub mod input;
pub mod keys;
pub mod server;

pub use acl::AccessControlList;
pub use address::Address;
pub use ciphertext::{Binding, SealedCiphertext};
pub use decrypt::{SignedDecryptRequest, UserDecryptRequest, SECONDS_PER_DAY};
pub use engine::{AccessControl, CiphertextStore, Engine, InputVerifier, UserDecryptor};
pub use errors::FHEError;
pub use handle::{CiphertextHandle, FheType, HANDLE_VERSION};
pub use input::{EncryptedInput, EncryptedInputBuilder, InputProof, MAX_INPUTS};
pub use keys::{NetworkKeyPair, NetworkPublicKey};
pub use server::FHEServer;

/// Local development chain id
pub const DEFAULT_CHAIN_ID: u64 = 31337;

/// Longest validity a user decryption request may ask for
pub const MAX_DECRYPT_DURATION_DAYS: u32 = 365;

/// Engine configuration
#[derive(Clone, Debug)]
pub struct FHEConfig {
    /// Chain id handles and proofs must carry
    pub chain_id: u64,
    /// Upper bound on a decryption request's validity
    pub max_decrypt_duration_days: u32,
}

impl Default for FHEConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            max_decrypt_duration_days: MAX_DECRYPT_DURATION_DAYS,
        }
    }
}

impl FHEConfig {
    /// Configuration for a given chain
    pub fn for_chain(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Default::default()
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> FHEResult<()> {
        if self.max_decrypt_duration_days == 0 {
            return Err(FHEError::ConfigError(
                "max_decrypt_duration_days must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Result type for engine operations
pub type FHEResult<T> = Result<T, FHEError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = FHEConfig::default();
        assert_eq!(config.chain_id, DEFAULT_CHAIN_ID);
        assert_eq!(config.max_decrypt_duration_days, 365);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_duration() {
        let config = FHEConfig {
            max_decrypt_duration_days: 0,
            ..FHEConfig::for_chain(1)
        };
        assert!(config.validate().is_err());
    }
}
