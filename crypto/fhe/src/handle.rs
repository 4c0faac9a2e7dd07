//! Ciphertext handles
//!
//! A handle is a 32-byte reference to a ciphertext held by the engine. It is
//! never the ciphertext itself. Layout:
//!
//! ```text
//! [0..21)  digest of the sealed ciphertext
//! [21]     index of the value inside its encrypted input
//! [22..30) chain id, big endian
//! [30]     FHE type
//! [31]     handle version
//! ```
//!
//! The all-zero handle is the empty sentinel meaning "no value". Every derived
//! handle carries a non-zero type byte, so it can never equal the sentinel.

use crate::{FHEError, FHEResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Current handle layout version
pub const HANDLE_VERSION: u8 = 0;

/// Domain separator for handle digests
const HANDLE_DOMAIN: &[u8] = b"soulsign_input_handle_v1";

/// Encrypted value types the engine understands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FheType {
    /// Encrypted unsigned 32-bit integer
    Euint32 = 4,
}

impl FheType {
    /// Type tag stored in byte 30 of a handle
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decode a type tag
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            4 => Some(FheType::Euint32),
            _ => None,
        }
    }
}

/// Opaque reference to an encrypted value
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CiphertextHandle([u8; 32]);

impl CiphertextHandle {
    /// The empty sentinel
    pub const EMPTY: CiphertextHandle = CiphertextHandle([0u8; 32]);

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// True for the sentinel
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Derive the handle of the `index`-th value of an encrypted input
    pub fn derive(ciphertext_digest: &[u8; 32], index: u8, chain_id: u64, fhe_type: FheType) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(HANDLE_DOMAIN);
        hasher.update(ciphertext_digest);
        hasher.update(&[index]);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes[..21].copy_from_slice(&digest.as_bytes()[..21]);
        bytes[21] = index;
        bytes[22..30].copy_from_slice(&chain_id.to_be_bytes());
        bytes[30] = fhe_type.as_byte();
        bytes[31] = HANDLE_VERSION;
        Self(bytes)
    }

    /// Position of the value inside its encrypted input
    pub fn index(&self) -> u8 {
        self.0[21]
    }

    /// Chain id the handle was created for
    pub fn chain_id(&self) -> u64 {
        let mut id = [0u8; 8];
        id.copy_from_slice(&self.0[22..30]);
        u64::from_be_bytes(id)
    }

    /// Encrypted type, if the tag is known
    pub fn fhe_type(&self) -> Option<FheType> {
        FheType::from_byte(self.0[30])
    }

    /// Layout version
    pub fn version(&self) -> u8 {
        self.0[31]
    }

    /// Lower-case hex with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse a handle from its text form.
    ///
    /// Every empty spelling (`""`, `"0x"`, `"0x0"`, any run of zeros up to the
    /// full width) normalizes to [`CiphertextHandle::EMPTY`]. Anything else
    /// must be exactly 32 bytes of hex.
    pub fn parse(s: &str) -> FHEResult<Self> {
        let s = s.trim();
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if body.len() <= 64 && body.bytes().all(|b| b == b'0') {
            return Ok(Self::EMPTY);
        }

        if body.len() != 64 {
            return Err(FHEError::InvalidHandle(format!(
                "Expected 64 hex characters, got {}",
                body.len()
            )));
        }

        let bytes = hex::decode(body).map_err(|e| FHEError::InvalidHandle(e.to_string()))?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("CiphertextHandle(EMPTY)")
        } else {
            write!(f, "CiphertextHandle({}…)", &self.to_hex()[..18])
        }
    }
}

impl FromStr for CiphertextHandle {
    type Err = FHEError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spellings_normalize() {
        for s in ["", "0x", "0x0", "0X00", "0", &format!("0x{}", "0".repeat(64))] {
            assert_eq!(CiphertextHandle::parse(s).unwrap(), CiphertextHandle::EMPTY, "{s:?}");
        }
    }

    #[test]
    fn test_rejects_short_nonzero() {
        assert!(matches!(
            CiphertextHandle::parse("0x01"),
            Err(FHEError::InvalidHandle(_))
        ));
        assert!(CiphertextHandle::parse(&"0".repeat(66)).is_err());
    }

    #[test]
    fn test_derived_layout() {
        let handle = CiphertextHandle::derive(&[9u8; 32], 3, 31337, FheType::Euint32);
        assert!(!handle.is_empty());
        assert_eq!(handle.index(), 3);
        assert_eq!(handle.chain_id(), 31337);
        assert_eq!(handle.fhe_type(), Some(FheType::Euint32));
        assert_eq!(handle.version(), HANDLE_VERSION);

        let parsed = CiphertextHandle::parse(&handle.to_hex()).unwrap();
        assert_eq!(parsed, handle);
    }

    #[test]
    fn test_derived_never_empty() {
        // zero digest, zero index, zero chain: the type byte still sets it apart
        let handle = CiphertextHandle::derive(&[0u8; 32], 0, 0, FheType::Euint32);
        assert_ne!(handle, CiphertextHandle::EMPTY);
    }
}
