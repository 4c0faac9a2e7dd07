//! Engine interfaces consumed by the registry
//!
//! The registry never holds key material. It reaches the engine only through
//! these traits, so any engine that verifies proofs, keeps an access list and
//! answers signed decryption requests can sit behind it.

use crate::address::Address;
use crate::decrypt::SignedDecryptRequest;
use crate::handle::CiphertextHandle;
use crate::input::InputProof;
use crate::FHEResult;

/// Validates proof-carrying inputs
pub trait InputVerifier: Send + Sync {
    /// Check that `handle` was built by `user` for `contract` and ingest it.
    ///
    /// On success the engine knows the ciphertext and `contract` is allowed on
    /// the returned handle.
    fn verify_input(
        &self,
        handle: &CiphertextHandle,
        proof: &InputProof,
        user: &Address,
        contract: &Address,
    ) -> FHEResult<CiphertextHandle>;
}

/// Per-handle permissions
pub trait AccessControl: Send + Sync {
    /// `granter` allows `grantee` on `handle`. The granter must already be
    /// allowed.
    fn allow(&self, handle: &CiphertextHandle, granter: &Address, grantee: &Address) -> FHEResult<()>;

    /// Check a permission
    fn is_allowed(&self, handle: &CiphertextHandle, account: &Address) -> bool;
}

/// Authorized decryption
pub trait UserDecryptor: Send + Sync {
    /// Decrypt for the signer of `request`, evaluated at unix time `now`
    fn user_decrypt(&self, request: &SignedDecryptRequest, now: u64) -> FHEResult<u32>;
}

/// Moves single ingested ciphertexts in and out of the engine, so a ledger
/// can persist them next to the record that references them
pub trait CiphertextStore: Send + Sync {
    /// Opaque bytes for an ingested ciphertext
    fn export_ciphertext(&self, handle: &CiphertextHandle) -> FHEResult<Vec<u8>>;

    /// Re-ingest bytes produced by [`CiphertextStore::export_ciphertext`].
    ///
    /// The bytes must authenticate under this engine's key and match
    /// `handle`. Afterwards the contract the ciphertext is bound to is allowed
    /// on it, as after [`InputVerifier::verify_input`]. Importing a handle the
    /// engine already holds changes nothing.
    fn import_ciphertext(&self, handle: &CiphertextHandle, bytes: &[u8]) -> FHEResult<()>;
}

/// Everything a ledger needs from its engine
pub trait Engine: InputVerifier + AccessControl + UserDecryptor + CiphertextStore {}

impl<T: InputVerifier + AccessControl + UserDecryptor + CiphertextStore> Engine for T {}
