//! Transaction runtime
//!
//! Serializes writes to a ledger. A submitted transaction is authenticated,
//! checked against the sender's nonce and applied under one write lock, so
//! concurrent submissions for the same identity resolve to exactly one
//! success. Reads share the lock and never observe a half-applied write.

use crate::event::EventRecord;
use crate::journal::{MemoryJournal, RegistryJournal};
use crate::ledger::RegistrationLedger;
use crate::transaction::{Call, SignedTransaction, TransactionReceipt};
use crate::{Identity, RegistryError, RegistryResult};
use parking_lot::RwLock;
use soulsign_fhe::{Address, CiphertextHandle, Engine};
use std::collections::HashMap;
use tracing::debug;

struct RuntimeState<E: Engine, J: RegistryJournal> {
    ledger: RegistrationLedger<E, J>,
    nonces: HashMap<Identity, u64>,
}

/// Thread-safe front of a ledger
pub struct LedgerRuntime<E: Engine, J: RegistryJournal = MemoryJournal> {
    address: Address,
    state: RwLock<RuntimeState<E, J>>,
}

impl<E: Engine, J: RegistryJournal> LedgerRuntime<E, J> {
    /// Wrap `ledger`. Nonces are recovered from its event log, one per
    /// applied transaction.
    pub fn new(ledger: RegistrationLedger<E, J>) -> Self {
        let mut nonces: HashMap<Identity, u64> = HashMap::new();
        for record in ledger.events() {
            *nonces.entry(record.event.actor()).or_default() += 1;
        }

        Self {
            address: ledger.address(),
            state: RwLock::new(RuntimeState { ledger, nonces }),
        }
    }

    /// Ledger address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Authenticate and apply a transaction
    pub fn submit(&self, tx: &SignedTransaction) -> RegistryResult<TransactionReceipt> {
        let sender = tx.sender()?;
        let tx_hash = tx.hash()?;

        if tx.transaction.to != self.address {
            return Err(RegistryError::WrongLedger {
                expected: self.address,
                got: tx.transaction.to,
            });
        }

        let mut state = self.state.write();

        let expected = state.nonces.get(&sender).copied().unwrap_or(0);
        if tx.transaction.nonce != expected {
            return Err(RegistryError::InvalidNonce {
                expected,
                got: tx.transaction.nonce,
            });
        }

        let event = match &tx.transaction.call {
            Call::Register { ciphertext, proof } => state.ledger.register(sender, *ciphertext, proof)?,
            Call::AllowViewer { viewer } => state.ledger.allow_viewer(sender, *viewer)?,
        };
        state.nonces.insert(sender, expected + 1);

        debug!(sender = %sender, nonce = expected, tx = %hex::encode(&tx_hash[..8]), "Transaction applied");

        Ok(TransactionReceipt {
            tx_hash,
            sequence: event.sequence,
            sender,
            logs: vec![event.to_log()],
        })
    }

    /// Stored handle for `subject`, or the empty sentinel
    pub fn get_encrypted(&self, subject: &Identity) -> CiphertextHandle {
        self.state.read().ledger.get_encrypted(subject)
    }

    pub fn is_registered(&self, subject: &Identity) -> bool {
        self.state.read().ledger.is_registered(subject)
    }

    /// Next nonce expected from `identity`
    pub fn nonce(&self, identity: &Identity) -> u64 {
        self.state.read().nonces.get(identity).copied().unwrap_or(0)
    }

    pub fn registered_count(&self) -> usize {
        self.state.read().ledger.registered_count()
    }

    /// Events with sequence `>= from`
    pub fn events_since(&self, from: u64) -> Vec<EventRecord> {
        self.state
            .read()
            .ledger
            .events()
            .iter()
            .filter(|record| record.sequence >= from)
            .cloned()
            .collect()
    }

    /// Run `f` against the ledger under the read lock
    pub fn with_ledger<R>(&self, f: impl FnOnce(&RegistrationLedger<E, J>) -> R) -> R {
        f(&self.state.read().ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::FailingJournal;
    use crate::transaction::Transaction;
    use ed25519_dalek::SigningKey;
    use soulsign_fhe::{EncryptedInputBuilder, FHEConfig, FHEServer};
    use std::sync::Arc;

    fn setup() -> (Arc<FHEServer>, LedgerRuntime<FHEServer>) {
        let engine = Arc::new(FHEServer::generate(FHEConfig::default()));
        let address = Address::from_bytes([0x5e; 20]);
        let runtime = LedgerRuntime::new(RegistrationLedger::new(address, engine.clone()));
        (engine, runtime)
    }

    fn register_tx(
        engine: &FHEServer,
        runtime: &LedgerRuntime<FHEServer>,
        key: &SigningKey,
        nonce: u64,
        value: u32,
    ) -> SignedTransaction {
        register_tx_for(engine, runtime.address(), key, nonce, value)
    }

    fn register_tx_for(engine: &FHEServer, ledger: Address, key: &SigningKey, nonce: u64, value: u32) -> SignedTransaction {
        let sender = Address::from_verifying_key(&key.verifying_key());
        let input = EncryptedInputBuilder::new(engine.public_key(), ledger, sender, engine.config().chain_id)
            .add32(value)
            .encrypt()
            .unwrap();
        Transaction::new(
            ledger,
            nonce,
            Call::Register {
                ciphertext: input.handles[0],
                proof: input.input_proof,
            },
        )
        .sign(key)
        .unwrap()
    }

    #[test]
    fn test_submit_register() {
        let (engine, runtime) = setup();
        let key = SigningKey::from_bytes(&[1u8; 32]);
        let sender = Address::from_verifying_key(&key.verifying_key());

        let receipt = runtime.submit(&register_tx(&engine, &runtime, &key, 0, 19990521)).unwrap();
        assert_eq!(receipt.sender, sender);
        assert_eq!(receipt.sequence, 0);
        assert_eq!(receipt.logs.len(), 1);
        assert!(runtime.is_registered(&sender));
        assert_eq!(runtime.nonce(&sender), 1);
    }

    #[test]
    fn test_nonce_enforced() {
        let (engine, runtime) = setup();
        let key = SigningKey::from_bytes(&[1u8; 32]);

        let err = runtime.submit(&register_tx(&engine, &runtime, &key, 5, 1)).unwrap_err();
        assert_eq!(err, RegistryError::InvalidNonce { expected: 0, got: 5 });
    }

    #[test]
    fn test_failed_call_keeps_nonce() {
        let (engine, runtime) = setup();
        let key = SigningKey::from_bytes(&[1u8; 32]);
        let sender = Address::from_verifying_key(&key.verifying_key());

        runtime.submit(&register_tx(&engine, &runtime, &key, 0, 1)).unwrap();
        let err = runtime.submit(&register_tx(&engine, &runtime, &key, 1, 2)).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered(sender));
        assert_eq!(runtime.nonce(&sender), 1);
    }

    #[test]
    fn test_wrong_ledger() {
        let (engine, runtime) = setup();
        let key = SigningKey::from_bytes(&[1u8; 32]);
        let mut tx = register_tx(&engine, &runtime, &key, 0, 1).transaction;
        tx.to = Address::from_bytes([0x01; 20]);

        let err = runtime.submit(&tx.sign(&key).unwrap()).unwrap_err();
        assert!(matches!(err, RegistryError::WrongLedger { .. }));
    }

    #[test]
    fn test_nonces_recovered_from_events() {
        let (engine, runtime) = setup();
        let key = SigningKey::from_bytes(&[1u8; 32]);
        let alice = Address::from_verifying_key(&key.verifying_key());
        let bob = Address::from_bytes([0xb0; 20]);

        runtime.submit(&register_tx(&engine, &runtime, &key, 0, 19990521)).unwrap();
        let share = Transaction::new(runtime.address(), 1, Call::AllowViewer { viewer: bob })
            .sign(&key)
            .unwrap();
        runtime.submit(&share).unwrap();

        let journal = runtime.with_ledger(|ledger| ledger.journal().clone());
        let reopened = LedgerRuntime::new(RegistrationLedger::open(runtime.address(), engine, journal).unwrap());
        assert_eq!(reopened.nonce(&alice), 2);
        assert_eq!(reopened.nonce(&bob), 0);
        assert_eq!(reopened.events_since(1).len(), 1);
    }

    #[test]
    fn test_journal_failure_keeps_nonce() {
        let engine = Arc::new(FHEServer::generate(FHEConfig::default()));
        let journal = FailingJournal {
            inner: MemoryJournal::new(),
            accept: 0,
        };
        let ledger = RegistrationLedger::open(Address::from_bytes([0x5e; 20]), engine.clone(), journal).unwrap();
        let runtime = LedgerRuntime::new(ledger);
        let key = SigningKey::from_bytes(&[1u8; 32]);
        let sender = Address::from_verifying_key(&key.verifying_key());

        let tx = register_tx_for(&engine, runtime.address(), &key, 0, 19990521);
        assert!(matches!(runtime.submit(&tx), Err(RegistryError::Journal(_))));
        assert_eq!(runtime.nonce(&sender), 0);
        assert!(runtime.get_encrypted(&sender).is_empty());
        assert!(runtime.events_since(0).is_empty());
    }
}
