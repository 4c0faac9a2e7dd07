//! User decryption requests
//!
//! A requester signs the handle, the contract whose context the handle lives
//! in, their own address and a validity window. The engine only answers when
//! the signing key maps to the named address and both the address and the
//! contract are on the handle's access list.

use crate::address::Address;
use crate::handle::CiphertextHandle;
use crate::{FHEError, FHEResult};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Domain separator for request signatures
const REQUEST_DOMAIN: &[u8] = b"soulsign_user_decrypt_v1";

/// Seconds per validity day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Unsigned decryption request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDecryptRequest {
    /// Handle to decrypt
    pub handle: CiphertextHandle,
    /// Contract context the handle is used in
    pub contract: Address,
    /// Requesting account
    pub user: Address,
    /// Start of validity, unix seconds
    pub start_timestamp: u64,
    /// Validity length in days
    pub duration_days: u32,
}

impl UserDecryptRequest {
    /// Build a request valid from `start_timestamp` for `duration_days`
    pub fn new(
        handle: CiphertextHandle,
        contract: Address,
        user: Address,
        start_timestamp: u64,
        duration_days: u32,
    ) -> Self {
        Self {
            handle,
            contract,
            user,
            start_timestamp,
            duration_days,
        }
    }

    /// First second at which the request is no longer valid
    pub fn expires_at(&self) -> u64 {
        self.start_timestamp
            .saturating_add(u64::from(self.duration_days).saturating_mul(SECONDS_PER_DAY))
    }

    /// Bytes covered by the signature
    pub fn signing_digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(REQUEST_DOMAIN);
        hasher.update(self.handle.as_bytes());
        hasher.update(self.contract.as_bytes());
        hasher.update(self.user.as_bytes());
        hasher.update(&self.start_timestamp.to_be_bytes());
        hasher.update(&self.duration_days.to_be_bytes());
        *hasher.finalize().as_bytes()
    }

    /// Sign with the requester's key
    pub fn sign(self, key: &SigningKey) -> SignedDecryptRequest {
        let signature = key.sign(&self.signing_digest());
        SignedDecryptRequest {
            request: self,
            public_key: key.verifying_key().to_bytes(),
            signature: signature.to_bytes().to_vec(),
        }
    }
}

/// Request plus the requester's signature
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedDecryptRequest {
    /// The request
    pub request: UserDecryptRequest,
    /// Requester's Ed25519 verifying key
    pub public_key: [u8; 32],
    /// Ed25519 signature over the request digest
    pub signature: Vec<u8>,
}

impl SignedDecryptRequest {
    /// Check the signature and that the key controls `request.user`
    pub fn verify(&self) -> FHEResult<()> {
        let key = VerifyingKey::from_bytes(&self.public_key)
            .map_err(|e| FHEError::DecryptionDenied(format!("Bad verifying key: {e}")))?;

        if Address::from_verifying_key(&key) != self.request.user {
            return Err(FHEError::DecryptionDenied(
                "Signing key does not control the requesting address".into(),
            ));
        }

        let signature = Signature::from_slice(&self.signature)
            .map_err(|e| FHEError::DecryptionDenied(format!("Malformed signature: {e}")))?;

        key.verify(&self.request.signing_digest(), &signature)
            .map_err(|_| FHEError::DecryptionDenied("Signature verification failed".into()))
    }
}
