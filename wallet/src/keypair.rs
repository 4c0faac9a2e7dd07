//! Registrant keypair

use crate::{WalletError, WalletResult};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use soulsign_registry::Identity;
use zeroize::Zeroizing;

/// Ed25519 signing key whose address is the registrant identity
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Generate a new keypair
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(bytes),
        }
    }

    /// Parse a hex secret, `0x` prefix optional
    pub fn from_secret_hex(s: &str) -> WalletResult<Self> {
        let body = s.trim().trim_start_matches("0x");
        let bytes = Zeroizing::new(hex::decode(body).map_err(|e| WalletError::InvalidKey(e.to_string()))?);
        let secret: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| WalletError::InvalidKey(format!("Expected 32 bytes, got {}", bytes.len())))?;
        let keypair = Self::from_secret_bytes(&secret);
        Ok(keypair)
    }

    /// Hex secret, for the keystore
    pub fn secret_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.signing.to_bytes()))
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }

    /// Registry identity controlled by this key
    pub fn identity(&self) -> Identity {
        Identity::from_verifying_key(&self.signing.verifying_key())
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair").field("identity", &self.identity()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip_keeps_identity() {
        let keypair = Keypair::generate();
        let restored = Keypair::from_secret_hex(&keypair.secret_hex()).unwrap();
        assert_eq!(restored.identity(), keypair.identity());
    }

    #[test]
    fn test_rejects_short_secret() {
        assert!(matches!(
            Keypair::from_secret_hex("0xabcd"),
            Err(WalletError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let keypair = Keypair::from_secret_bytes(&[7u8; 32]);
        let debug = format!("{keypair:?}");
        assert!(!debug.contains(&*keypair.secret_hex()));
    }
}
