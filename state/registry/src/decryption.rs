//! Authorized decryption of registered values
//!
//! The ledger answers reads with handles. Turning a handle back into a value
//! goes through the engine with a request signed by an account the engine
//! has on the handle's access list. Unregistered subjects decrypt to `None`.

use crate::journal::RegistryJournal;
use crate::runtime::LedgerRuntime;
use crate::{Identity, RegistryError, RegistryResult};
use soulsign_fhe::{Address, CiphertextHandle, Engine, FHEError, SignedDecryptRequest, UserDecryptor};
use std::sync::Arc;
use tracing::warn;

/// Decryption gateway for one ledger
pub struct AuthorizedDecryption<D: UserDecryptor> {
    engine: Arc<D>,
    ledger: Address,
}

impl<D: UserDecryptor> AuthorizedDecryption<D> {
    pub fn new(engine: Arc<D>, ledger: Address) -> Self {
        Self { engine, ledger }
    }

    /// Decrypt `stored`, a handle read from the ledger, at unix time `now`
    pub fn decrypt(
        &self,
        stored: &CiphertextHandle,
        request: &SignedDecryptRequest,
        now: u64,
    ) -> RegistryResult<Option<u32>> {
        if stored.is_empty() {
            return Ok(None);
        }
        if request.request.handle != *stored {
            return Err(RegistryError::DecryptionDenied(
                "Request names a different handle".into(),
            ));
        }
        if request.request.contract != self.ledger {
            return Err(RegistryError::DecryptionDenied(format!(
                "Request is scoped to {}, not this ledger",
                request.request.contract
            )));
        }

        match self.engine.user_decrypt(request, now) {
            Ok(value) => Ok(Some(value)),
            Err(FHEError::DecryptionDenied(msg)) | Err(FHEError::UnknownHandle(msg)) => {
                warn!(user = %request.request.user, "Decryption denied");
                Err(RegistryError::DecryptionDenied(msg))
            }
            Err(err @ FHEError::AccessDenied { .. }) => Err(RegistryError::DecryptionDenied(err.to_string())),
            Err(err) => Err(RegistryError::Engine(err.to_string())),
        }
    }

    /// Read `subject`'s handle from `runtime` and decrypt it
    pub fn decrypt_registered<E: Engine, J: RegistryJournal>(
        &self,
        runtime: &LedgerRuntime<E, J>,
        subject: &Identity,
        request: &SignedDecryptRequest,
        now: u64,
    ) -> RegistryResult<Option<u32>> {
        let stored = runtime.get_encrypted(subject);
        self.decrypt(&stored, request, now)
    }
}
