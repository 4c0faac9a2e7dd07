//! Registered records

use crate::Identity;
use serde::{Deserialize, Serialize};
use soulsign_fhe::CiphertextHandle;

/// One identity's encrypted registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    /// Authenticated sender that wrote the record
    pub owner: Identity,
    /// Handle of the encrypted value
    pub ciphertext: CiphertextHandle,
    /// Set once written
    pub registered: bool,
}

impl EncryptedRecord {
    /// A freshly registered record
    pub fn new(owner: Identity, ciphertext: CiphertextHandle) -> Self {
        Self {
            owner,
            ciphertext,
            registered: true,
        }
    }

    /// The view of an identity that never registered
    pub fn unregistered(owner: Identity) -> Self {
        Self {
            owner,
            ciphertext: CiphertextHandle::EMPTY,
            registered: false,
        }
    }

    /// A record is live when it holds a non-sentinel handle
    pub fn is_live(&self) -> bool {
        self.registered && !self.ciphertext.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulsign_fhe::Address;

    #[test]
    fn test_unregistered_is_sentinel() {
        let record = EncryptedRecord::unregistered(Address::from_bytes([1u8; 20]));
        assert!(!record.is_live());
        assert!(record.ciphertext.is_empty());
    }

    #[test]
    fn test_new_is_live() {
        let record = EncryptedRecord::new(
            Address::from_bytes([1u8; 20]),
            CiphertextHandle::from_bytes([2u8; 32]),
        );
        assert!(record.is_live());
    }
}
