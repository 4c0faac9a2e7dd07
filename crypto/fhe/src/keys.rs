//! Engine key management
//!
//! - NetworkKeyPair: X25519 static key held by the engine (secret)
//! - NetworkPublicKey: published so clients can seal inputs to the engine

use crate::{FHEError, FHEResult};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroizing;

/// Public half of the engine key
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkPublicKey([u8; 32]);

impl NetworkPublicKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short identifier used in logs
    pub fn id(&self) -> [u8; 32] {
        *blake3::hash(&self.0).as_bytes()
    }

    /// Hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex
    pub fn from_hex(s: &str) -> FHEResult<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| FHEError::InvalidKey(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| FHEError::InvalidKey("Expected 32 bytes".into()))?;
        Ok(Self(arr))
    }

    pub(crate) fn to_x25519(self) -> X25519PublicKey {
        X25519PublicKey::from(self.0)
    }
}

impl fmt::Debug for NetworkPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkPublicKey")
            .field("id", &hex::encode(&self.id()[..8]))
            .finish()
    }
}

/// Engine key pair
#[derive(Clone)]
pub struct NetworkKeyPair {
    secret: StaticSecret,
    public: NetworkPublicKey,
}

impl NetworkKeyPair {
    /// Generate a fresh key pair
    pub fn generate() -> Self {
        Self::from_secret(StaticSecret::random_from_rng(OsRng))
    }

    /// Rebuild from stored secret bytes
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self::from_secret(StaticSecret::from(bytes))
    }

    fn from_secret(secret: StaticSecret) -> Self {
        let public = NetworkPublicKey(X25519PublicKey::from(&secret).to_bytes());
        Self { secret, public }
    }

    /// Export the secret for persistence
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.to_bytes())
    }

    /// Public half
    pub fn public(&self) -> NetworkPublicKey {
        self.public
    }

    /// X25519 agreement with a client's ephemeral key
    pub(crate) fn agree(&self, ephemeral_public: &[u8; 32]) -> Zeroizing<[u8; 32]> {
        let shared = self
            .secret
            .diffie_hellman(&X25519PublicKey::from(*ephemeral_public));
        Zeroizing::new(shared.to_bytes())
    }
}

impl fmt::Debug for NetworkKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkKeyPair")
            .field("public_id", &hex::encode(&self.public.id()[..8]))
            .finish()
    }
}
