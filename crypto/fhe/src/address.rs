//! Account addresses
//!
//! Users and ledgers share one 20-byte address space. A user address is
//! derived from an Ed25519 verifying key, a ledger address from its deployer
//! and a salt.

use crate::{FHEError, FHEResult};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain separator for user addresses
const USER_ADDRESS_DOMAIN: &[u8] = b"soulsign_address_v1";

/// Domain separator for contract addresses
const CONTRACT_ADDRESS_DOMAIN: &[u8] = b"soulsign_contract_v1";

/// A 20-byte account address
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derive the address controlled by an Ed25519 verifying key
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(USER_ADDRESS_DOMAIN);
        hasher.update(key.as_bytes());
        Self::from_digest(hasher.finalize().as_bytes())
    }

    /// Derive a contract address from its deployer and a salt
    pub fn derive_contract(deployer: &Address, salt: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(CONTRACT_ADDRESS_DOMAIN);
        hasher.update(&deployer.0);
        hasher.update(&(salt.len() as u64).to_le_bytes());
        hasher.update(salt);
        Self::from_digest(hasher.finalize().as_bytes())
    }

    fn from_digest(digest: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Lower-case hex with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without `0x` prefix
    pub fn from_hex(s: &str) -> FHEResult<Self> {
        let s = s.trim();
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        let bytes = hex::decode(body).map_err(|e| FHEError::InvalidAddress(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(FHEError::InvalidAddress(format!(
                "Expected 20 bytes, got {}",
                bytes.len()
            )));
        }

        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = FHEError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;

    #[test]
    fn test_hex_roundtrip_with_and_without_prefix() {
        let addr = Address::from_bytes([0xab; 20]);
        let hex = addr.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(Address::from_hex(&hex).unwrap(), addr);
        assert_eq!(Address::from_hex(&hex[2..]).unwrap(), addr);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(matches!(
            Address::from_hex("0x1234"),
            Err(FHEError::InvalidAddress(_))
        ));
        assert!(Address::from_hex("not hex").is_err());
    }

    #[test]
    fn test_key_derivation_is_deterministic() {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let a = Address::from_verifying_key(&key.verifying_key());
        let b = Address::from_verifying_key(&key.verifying_key());
        assert_eq!(a, b);

        let other = SigningKey::from_bytes(&[8u8; 32]);
        assert_ne!(a, Address::from_verifying_key(&other.verifying_key()));
    }

    #[test]
    fn test_contract_derivation_depends_on_salt() {
        let deployer = Address::from_bytes([1u8; 20]);
        assert_ne!(
            Address::derive_contract(&deployer, b"a"),
            Address::derive_contract(&deployer, b"b")
        );
    }
}
