//! Keystore files
//!
//! A keystore is a small JSON document holding the signing secret and the
//! identity it controls. The identity is re-derived on load and must match.

use crate::{Keypair, WalletError, WalletResult};
use serde::{Deserialize, Serialize};
use soulsign_registry::Identity;
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

/// Current keystore format
pub const KEYSTORE_VERSION: u32 = 1;

/// On-disk keystore layout
#[derive(Serialize, Deserialize)]
pub struct Keystore {
    pub version: u32,
    /// Identity derived from the key, as `0x` hex
    pub identity: String,
    /// Ed25519 verifying key, hex
    pub public_key: String,
    /// Ed25519 secret, hex
    secret_key: String,
}

impl Keystore {
    pub fn from_keypair(keypair: &Keypair) -> Self {
        Self {
            version: KEYSTORE_VERSION,
            identity: keypair.identity().to_hex(),
            public_key: hex::encode(keypair.verifying_key().to_bytes()),
            secret_key: keypair.secret_hex().to_string(),
        }
    }

    /// Rebuild the keypair and check it against the stored identity
    pub fn keypair(&self) -> WalletResult<Keypair> {
        let keypair = Keypair::from_secret_hex(&self.secret_key)?;
        let stored = Identity::from_hex(&self.identity).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        if keypair.identity() != stored {
            return Err(WalletError::IdentityMismatch);
        }
        Ok(keypair)
    }

    /// Write a new keystore file; refuses to overwrite
    pub fn save(&self, path: &Path) -> WalletResult<()> {
        if path.exists() {
            return Err(WalletError::AlreadyExists(path.display().to_string()));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = Zeroizing::new(serde_json::to_string_pretty(self)?);
        fs::write(path, json.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    pub fn load(path: &Path) -> WalletResult<Self> {
        if !path.exists() {
            return Err(WalletError::NotFound(path.display().to_string()));
        }
        let json = Zeroizing::new(fs::read_to_string(path)?);
        Ok(serde_json::from_str(&json)?)
    }
}

impl Drop for Keystore {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.secret_key);
    }
}

/// Generate a keypair and write it to `path`
pub fn create(path: &Path) -> WalletResult<Keypair> {
    let keypair = Keypair::generate();
    Keystore::from_keypair(&keypair).save(path)?;
    Ok(keypair)
}

/// Load the keypair stored at `path`
pub fn open(path: &Path) -> WalletResult<Keypair> {
    Keystore::load(path)?.keypair()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_then_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        let created = create(&path).unwrap();
        let opened = open(&path).unwrap();
        assert_eq!(created.identity(), opened.identity());
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        create(&path).unwrap();
        assert!(matches!(create(&path), Err(WalletError::AlreadyExists(_))));
    }

    #[test]
    fn test_detects_identity_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        let mut keystore = Keystore::from_keypair(&Keypair::from_secret_bytes(&[1u8; 32]));
        keystore.identity = Keypair::from_secret_bytes(&[2u8; 32]).identity().to_hex();
        keystore.save(&path).unwrap();

        assert!(matches!(open(&path), Err(WalletError::IdentityMismatch)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            open(&dir.path().join("absent.json")),
            Err(WalletError::NotFound(_))
        ));
    }
}
