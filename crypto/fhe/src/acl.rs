//! Access control list over ciphertext handles

use crate::address::Address;
use crate::handle::CiphertextHandle;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Accounts allowed to use each handle
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccessControlList {
    entries: HashMap<CiphertextHandle, BTreeSet<Address>>,
}

impl AccessControlList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `account` on `handle`. Returns false if it was already allowed.
    pub fn grant(&mut self, handle: CiphertextHandle, account: Address) -> bool {
        self.entries.entry(handle).or_default().insert(account)
    }

    /// Check a permission
    pub fn is_allowed(&self, handle: &CiphertextHandle, account: &Address) -> bool {
        self.entries
            .get(handle)
            .map(|accounts| accounts.contains(account))
            .unwrap_or(false)
    }

    /// All accounts allowed on `handle`, sorted
    pub fn allowed(&self, handle: &CiphertextHandle) -> Vec<Address> {
        self.entries
            .get(handle)
            .map(|accounts| accounts.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of handles with at least one permission
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_and_check() {
        let mut acl = AccessControlList::new();
        let handle = CiphertextHandle::from_bytes([5u8; 32]);
        let alice = Address::from_bytes([1u8; 20]);
        let bob = Address::from_bytes([2u8; 20]);

        assert!(!acl.is_allowed(&handle, &alice));
        assert!(acl.grant(handle, alice));
        assert!(!acl.grant(handle, alice));

        assert!(acl.is_allowed(&handle, &alice));
        assert!(!acl.is_allowed(&handle, &bob));
        assert_eq!(acl.allowed(&handle), vec![alice]);
        assert_eq!(acl.len(), 1);
    }
}
