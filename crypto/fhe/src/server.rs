//! Engine server
//!
//! Holds the network key, the ingested ciphertexts and the access list. It
//! verifies inputs, records permissions and answers signed user decryption
//! requests. Ledgers only ever see handles. Ingested ciphertexts leave the
//! engine one at a time through [`CiphertextStore`], for the ledger to persist.

use crate::acl::AccessControlList;
use crate::address::Address;
use crate::ciphertext::{Binding, SealedCiphertext};
use crate::decrypt::SignedDecryptRequest;
use crate::engine::{AccessControl, CiphertextStore, InputVerifier, UserDecryptor};
use crate::handle::CiphertextHandle;
use crate::input::InputProof;
use crate::keys::{NetworkKeyPair, NetworkPublicKey};
use crate::{FHEConfig, FHEError, FHEResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Ciphertext as kept by the engine
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredCiphertext {
    sealed: SealedCiphertext,
    binding: Binding,
}

/// Mutable engine state
#[derive(Debug, Default)]
struct ServerState {
    ciphertexts: HashMap<CiphertextHandle, StoredCiphertext>,
    acl: AccessControlList,
}

/// Reference encryption engine
pub struct FHEServer {
    keys: NetworkKeyPair,
    config: FHEConfig,
    state: RwLock<ServerState>,
}

impl FHEServer {
    /// Create a server around an existing key
    pub fn new(keys: NetworkKeyPair, config: FHEConfig) -> Self {
        info!(
            chain_id = config.chain_id,
            key = %hex::encode(&keys.public().id()[..8]),
            "FHE server started"
        );
        Self {
            keys,
            config,
            state: RwLock::new(ServerState::default()),
        }
    }

    /// Create a server with a fresh key
    pub fn generate(config: FHEConfig) -> Self {
        Self::new(NetworkKeyPair::generate(), config)
    }

    /// Key clients seal inputs to
    pub fn public_key(&self) -> NetworkPublicKey {
        self.keys.public()
    }

    /// Key pair, for persistence
    pub fn keys(&self) -> &NetworkKeyPair {
        &self.keys
    }

    /// Engine configuration
    pub fn config(&self) -> &FHEConfig {
        &self.config
    }

    /// Number of ingested ciphertexts
    pub fn ciphertext_count(&self) -> usize {
        self.state.read().ciphertexts.len()
    }

    /// Accounts allowed on `handle`
    pub fn allowed_accounts(&self, handle: &CiphertextHandle) -> Vec<Address> {
        self.state.read().acl.allowed(handle)
    }
}

impl std::fmt::Debug for FHEServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FHEServer")
            .field("keys", &self.keys)
            .field("chain_id", &self.config.chain_id)
            .field("ciphertexts", &self.ciphertext_count())
            .finish()
    }
}

impl InputVerifier for FHEServer {
    fn verify_input(
        &self,
        handle: &CiphertextHandle,
        proof: &InputProof,
        user: &Address,
        contract: &Address,
    ) -> FHEResult<CiphertextHandle> {
        if handle.is_empty() {
            return Err(FHEError::InvalidProof("Empty handle".into()));
        }

        let payload = proof.decode()?;

        if payload.user != *user || payload.contract != *contract {
            return Err(FHEError::InvalidProof(
                "Proof is bound to a different submitter or contract".into(),
            ));
        }
        if payload.chain_id != self.config.chain_id || handle.chain_id() != self.config.chain_id {
            return Err(FHEError::InvalidProof(format!(
                "Wrong chain: expected {}",
                self.config.chain_id
            )));
        }

        let index = handle.index();
        let sealed = payload
            .ciphertexts
            .get(usize::from(index))
            .ok_or_else(|| FHEError::InvalidProof(format!("No ciphertext at index {index}")))?;

        let expected = CiphertextHandle::derive(&sealed.digest(), index, payload.chain_id, sealed.fhe_type);
        if expected != *handle {
            return Err(FHEError::InvalidProof("Handle does not match proof".into()));
        }

        // Authenticate the ciphertext under its binding; the value is dropped.
        let binding = payload.binding(index);
        sealed
            .open_u32(&self.keys, &binding)
            .map_err(|_| FHEError::InvalidProof("Ciphertext failed authentication".into()))?;

        let mut state = self.state.write();
        state.ciphertexts.insert(
            *handle,
            StoredCiphertext {
                sealed: sealed.clone(),
                binding,
            },
        );
        state.acl.grant(*handle, *contract);

        debug!(handle = %handle, user = %user, contract = %contract, "Input verified");
        Ok(*handle)
    }
}

impl AccessControl for FHEServer {
    fn allow(&self, handle: &CiphertextHandle, granter: &Address, grantee: &Address) -> FHEResult<()> {
        let mut state = self.state.write();

        if !state.ciphertexts.contains_key(handle) {
            return Err(FHEError::UnknownHandle(handle.to_hex()));
        }
        if !state.acl.is_allowed(handle, granter) {
            return Err(FHEError::AccessDenied {
                account: granter.to_hex(),
                handle: handle.to_hex(),
            });
        }

        if state.acl.grant(*handle, *grantee) {
            debug!(handle = %handle, granter = %granter, grantee = %grantee, "Permission granted");
        }
        Ok(())
    }

    fn is_allowed(&self, handle: &CiphertextHandle, account: &Address) -> bool {
        self.state.read().acl.is_allowed(handle, account)
    }
}

impl CiphertextStore for FHEServer {
    fn export_ciphertext(&self, handle: &CiphertextHandle) -> FHEResult<Vec<u8>> {
        let state = self.state.read();
        let stored = state
            .ciphertexts
            .get(handle)
            .ok_or_else(|| FHEError::UnknownHandle(handle.to_hex()))?;
        Ok(bincode::serialize(stored)?)
    }

    fn import_ciphertext(&self, handle: &CiphertextHandle, bytes: &[u8]) -> FHEResult<()> {
        if self.state.read().ciphertexts.contains_key(handle) {
            return Ok(());
        }

        let stored: StoredCiphertext = bincode::deserialize(bytes)?;
        let binding = stored.binding;
        if binding.chain_id != self.config.chain_id {
            return Err(FHEError::InvalidHandle(format!(
                "Ciphertext bound to chain {}, engine serves {}",
                binding.chain_id, self.config.chain_id
            )));
        }

        let expected = CiphertextHandle::derive(
            &stored.sealed.digest(),
            binding.index,
            binding.chain_id,
            stored.sealed.fhe_type,
        );
        if expected != *handle {
            return Err(FHEError::InvalidHandle("Handle does not match ciphertext".into()));
        }

        stored
            .sealed
            .open_u32(&self.keys, &binding)
            .map_err(|_| FHEError::InvalidHandle("Ciphertext not sealed to this engine".into()))?;

        let mut state = self.state.write();
        state.ciphertexts.insert(*handle, stored);
        state.acl.grant(*handle, binding.contract);

        debug!(handle = %handle, contract = %binding.contract, "Ciphertext imported");
        Ok(())
    }
}

impl UserDecryptor for FHEServer {
    fn user_decrypt(&self, signed: &SignedDecryptRequest, now: u64) -> FHEResult<u32> {
        signed.verify()?;

        let request = &signed.request;
        if request.duration_days == 0 || request.duration_days > self.config.max_decrypt_duration_days {
            return Err(FHEError::DecryptionDenied(format!(
                "Validity must be 1..={} days",
                self.config.max_decrypt_duration_days
            )));
        }
        if now < request.start_timestamp {
            return Err(FHEError::DecryptionDenied("Request not yet valid".into()));
        }
        if now >= request.expires_at() {
            return Err(FHEError::DecryptionDenied("Request expired".into()));
        }

        let state = self.state.read();
        let stored = state
            .ciphertexts
            .get(&request.handle)
            .ok_or_else(|| FHEError::UnknownHandle(request.handle.to_hex()))?;

        if !state.acl.is_allowed(&request.handle, &request.user) {
            warn!(handle = %request.handle, user = %request.user, "Decryption denied: user not allowed");
            return Err(FHEError::DecryptionDenied(format!(
                "{} is not allowed on this handle",
                request.user
            )));
        }
        if !state.acl.is_allowed(&request.handle, &request.contract) {
            warn!(handle = %request.handle, contract = %request.contract, "Decryption denied: contract not allowed");
            return Err(FHEError::DecryptionDenied(format!(
                "Handle is not usable in contract {}",
                request.contract
            )));
        }

        let value = stored.sealed.open_u32(&self.keys, &stored.binding)?;
        info!(handle = %request.handle, user = %request.user, "User decryption granted");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decrypt::UserDecryptRequest;
    use crate::input::EncryptedInputBuilder;
    use ed25519_dalek::SigningKey;

    const NOW: u64 = 1_700_000_000;

    struct Fixture {
        server: FHEServer,
        contract: Address,
        alice_key: SigningKey,
        alice: Address,
    }

    fn fixture() -> Fixture {
        let server = FHEServer::generate(FHEConfig::default());
        let alice_key = SigningKey::from_bytes(&[11u8; 32]);
        let alice = Address::from_verifying_key(&alice_key.verifying_key());
        Fixture {
            server,
            contract: Address::from_bytes([0xcc; 20]),
            alice_key,
            alice,
        }
    }

    fn encrypt(f: &Fixture, user: Address, value: u32) -> (CiphertextHandle, InputProof) {
        let input = EncryptedInputBuilder::new(
            f.server.public_key(),
            f.contract,
            user,
            f.server.config().chain_id,
        )
        .add32(value)
        .encrypt()
        .unwrap();
        (input.handles[0], input.input_proof)
    }

    #[test]
    fn test_verify_input_grants_contract() {
        let f = fixture();
        let (handle, proof) = encrypt(&f, f.alice, 19990521);

        let verified = f.server.verify_input(&handle, &proof, &f.alice, &f.contract).unwrap();
        assert_eq!(verified, handle);
        assert!(f.server.is_allowed(&handle, &f.contract));
        assert!(!f.server.is_allowed(&handle, &f.alice));
        assert_eq!(f.server.ciphertext_count(), 1);
    }

    #[test]
    fn test_proof_for_other_user_rejected() {
        let f = fixture();
        let (handle, proof) = encrypt(&f, f.alice, 1);
        let mallory = Address::from_bytes([0xee; 20]);

        let err = f.server.verify_input(&handle, &proof, &mallory, &f.contract).unwrap_err();
        assert!(matches!(err, FHEError::InvalidProof(_)));
        assert_eq!(f.server.ciphertext_count(), 0);
    }

    #[test]
    fn test_proof_for_other_contract_rejected() {
        let f = fixture();
        let (handle, proof) = encrypt(&f, f.alice, 1);
        let elsewhere = Address::from_bytes([0x01; 20]);
        assert!(f.server.verify_input(&handle, &proof, &f.alice, &elsewhere).is_err());
    }

    #[test]
    fn test_mismatched_handle_rejected() {
        let f = fixture();
        let (_, proof) = encrypt(&f, f.alice, 1);
        let (other_handle, _) = encrypt(&f, f.alice, 1);
        assert!(matches!(
            f.server.verify_input(&other_handle, &proof, &f.alice, &f.contract),
            Err(FHEError::InvalidProof(_))
        ));
    }

    #[test]
    fn test_allow_requires_allowed_granter() {
        let f = fixture();
        let (handle, proof) = encrypt(&f, f.alice, 1);
        f.server.verify_input(&handle, &proof, &f.alice, &f.contract).unwrap();

        let bob = Address::from_bytes([0xbb; 20]);
        assert!(matches!(
            f.server.allow(&handle, &bob, &bob),
            Err(FHEError::AccessDenied { .. })
        ));

        f.server.allow(&handle, &f.contract, &f.alice).unwrap();
        assert!(f.server.is_allowed(&handle, &f.alice));

        let unknown = CiphertextHandle::from_bytes([3u8; 32]);
        assert!(matches!(
            f.server.allow(&unknown, &f.contract, &f.alice),
            Err(FHEError::UnknownHandle(_))
        ));
    }

    #[test]
    fn test_user_decrypt_roundtrip() {
        let f = fixture();
        let (handle, proof) = encrypt(&f, f.alice, 19990521);
        f.server.verify_input(&handle, &proof, &f.alice, &f.contract).unwrap();
        f.server.allow(&handle, &f.contract, &f.alice).unwrap();

        let signed = UserDecryptRequest::new(handle, f.contract, f.alice, NOW, 1).sign(&f.alice_key);
        assert_eq!(f.server.user_decrypt(&signed, NOW + 10).unwrap(), 19990521);
    }

    #[test]
    fn test_user_decrypt_denied_without_permission() {
        let f = fixture();
        let (handle, proof) = encrypt(&f, f.alice, 5);
        f.server.verify_input(&handle, &proof, &f.alice, &f.contract).unwrap();

        // alice never granted
        let signed = UserDecryptRequest::new(handle, f.contract, f.alice, NOW, 1).sign(&f.alice_key);
        assert!(matches!(
            f.server.user_decrypt(&signed, NOW),
            Err(FHEError::DecryptionDenied(_))
        ));
    }

    #[test]
    fn test_user_decrypt_window() {
        let f = fixture();
        let (handle, proof) = encrypt(&f, f.alice, 5);
        f.server.verify_input(&handle, &proof, &f.alice, &f.contract).unwrap();
        f.server.allow(&handle, &f.contract, &f.alice).unwrap();

        let signed = UserDecryptRequest::new(handle, f.contract, f.alice, NOW, 1).sign(&f.alice_key);
        assert!(f.server.user_decrypt(&signed, NOW - 1).is_err());
        assert!(f.server.user_decrypt(&signed, NOW + 86_400).is_err());

        let too_long = UserDecryptRequest::new(handle, f.contract, f.alice, NOW, 10_000).sign(&f.alice_key);
        assert!(f.server.user_decrypt(&too_long, NOW).is_err());
    }

    #[test]
    fn test_export_import_into_fresh_server() {
        let f = fixture();
        let (handle, proof) = encrypt(&f, f.alice, 77);
        f.server.verify_input(&handle, &proof, &f.alice, &f.contract).unwrap();
        let bytes = f.server.export_ciphertext(&handle).unwrap();

        let keys = NetworkKeyPair::from_secret_bytes(*f.server.keys().secret_bytes());
        let fresh = FHEServer::new(keys, FHEConfig::default());
        fresh.import_ciphertext(&handle, &bytes).unwrap();
        // importing twice is harmless
        fresh.import_ciphertext(&handle, &bytes).unwrap();

        assert_eq!(fresh.ciphertext_count(), 1);
        assert_eq!(fresh.allowed_accounts(&handle), vec![f.contract]);

        fresh.allow(&handle, &f.contract, &f.alice).unwrap();
        let signed = UserDecryptRequest::new(handle, f.contract, f.alice, NOW, 1).sign(&f.alice_key);
        assert_eq!(fresh.user_decrypt(&signed, NOW).unwrap(), 77);
    }

    #[test]
    fn test_import_rejects_foreign_or_mismatched() {
        let f = fixture();
        let (handle, proof) = encrypt(&f, f.alice, 77);
        f.server.verify_input(&handle, &proof, &f.alice, &f.contract).unwrap();
        let bytes = f.server.export_ciphertext(&handle).unwrap();

        let other_engine = FHEServer::generate(FHEConfig::default());
        assert!(matches!(
            other_engine.import_ciphertext(&handle, &bytes),
            Err(FHEError::InvalidHandle(_))
        ));

        let keys = NetworkKeyPair::from_secret_bytes(*f.server.keys().secret_bytes());
        let fresh = FHEServer::new(keys, FHEConfig::default());
        let wrong = CiphertextHandle::from_bytes([3u8; 32]);
        assert!(fresh.import_ciphertext(&wrong, &bytes).is_err());
        assert_eq!(fresh.ciphertext_count(), 0);
    }

    #[test]
    fn test_export_unknown_handle() {
        let f = fixture();
        let unknown = CiphertextHandle::from_bytes([3u8; 32]);
        assert!(matches!(
            f.server.export_ciphertext(&unknown),
            Err(FHEError::UnknownHandle(_))
        ));
    }
}
