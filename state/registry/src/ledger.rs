//! Registration ledger
//!
//! Maps each identity to at most one encrypted value. The ledger never sees
//! a plaintext: it stores the handle the engine verified, grants itself and
//! the registrant access, and answers reads with handles only.
//!
//! A write is all-or-nothing. Every check runs before anything is journaled,
//! and the in-memory map only changes after the journal accepted the entry.
//! Registration entries carry the ciphertext export, so replaying the journal
//! also restores the engine's ciphertexts and permissions.

use crate::event::{EventRecord, RegistryEvent};
use crate::journal::{JournalEntry, MemoryJournal, RegistryJournal};
use crate::record::EncryptedRecord;
use crate::{Identity, RegistryError, RegistryResult};
use soulsign_fhe::{Address, CiphertextHandle, Engine, InputProof};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Single-write ledger of encrypted registrations
pub struct RegistrationLedger<E: Engine, J: RegistryJournal = MemoryJournal> {
    address: Address,
    engine: Arc<E>,
    records: HashMap<Identity, EncryptedRecord>,
    events: Vec<EventRecord>,
    journal: J,
}

impl<E: Engine> RegistrationLedger<E, MemoryJournal> {
    /// Empty ledger at `address` with an in-memory journal
    pub fn new(address: Address, engine: Arc<E>) -> Self {
        Self {
            address,
            engine,
            records: HashMap::new(),
            events: Vec::new(),
            journal: MemoryJournal::new(),
        }
    }
}

impl<E: Engine, J: RegistryJournal> RegistrationLedger<E, J> {
    /// Open a ledger over `journal`, replaying what it already holds
    pub fn open(address: Address, engine: Arc<E>, journal: J) -> RegistryResult<Self> {
        let mut ledger = Self {
            address,
            engine,
            records: HashMap::new(),
            events: Vec::new(),
            journal,
        };

        for entry in ledger.journal.replay()? {
            ledger.apply_replayed(entry)?;
        }

        info!(
            ledger = %ledger.address,
            records = ledger.records.len(),
            events = ledger.events.len(),
            "Registration ledger opened"
        );
        Ok(ledger)
    }

    fn apply_replayed(&mut self, entry: JournalEntry) -> RegistryResult<()> {
        let expected = self.events.len() as u64;
        if entry.event.sequence != expected {
            return Err(RegistryError::Journal(format!(
                "Event sequence gap: expected {expected}, found {}",
                entry.event.sequence
            )));
        }
        if entry.event.ledger != self.address {
            return Err(RegistryError::Journal(format!(
                "Journal belongs to ledger {}",
                entry.event.ledger
            )));
        }

        if let Some(record) = entry.record {
            if !record.is_live() {
                return Err(RegistryError::Journal(format!("Empty record for {}", record.owner)));
            }
            if self.records.contains_key(&record.owner) {
                return Err(RegistryError::Journal(format!(
                    "Identity {} registered twice",
                    record.owner
                )));
            }
            let sealed = entry.sealed.as_deref().ok_or_else(|| {
                RegistryError::Journal(format!("No ciphertext stored for {}", record.owner))
            })?;
            self.restore_engine_state(&record, sealed)?;
            self.records.insert(record.owner, record);
        }

        if let RegistryEvent::ViewerAllowed { owner, viewer } = &entry.event.event {
            let handle = self.get_encrypted(owner);
            if handle.is_empty() {
                return Err(RegistryError::Journal(format!("Viewer allowed on missing record of {owner}")));
            }
            self.engine
                .allow(&handle, &self.address, viewer)
                .map_err(|e| RegistryError::Journal(e.to_string()))?;
        }

        self.events.push(entry.event);
        Ok(())
    }

    // Same grants as a live registration; all idempotent on an engine that
    // already holds the ciphertext.
    fn restore_engine_state(&self, record: &EncryptedRecord, sealed: &[u8]) -> RegistryResult<()> {
        let handle = &record.ciphertext;
        self.engine
            .import_ciphertext(handle, sealed)
            .and_then(|()| self.engine.allow(handle, &self.address, &self.address))
            .and_then(|()| self.engine.allow(handle, &self.address, &record.owner))
            .map_err(|e| RegistryError::Journal(format!("Restoring {}: {e}", record.owner)))
    }

    /// Ledger address, used as the contract identity towards the engine
    pub fn address(&self) -> Address {
        self.address
    }

    /// Engine the ledger verifies inputs with
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Journal the ledger writes through
    pub fn journal(&self) -> &J {
        &self.journal
    }

    /// Register `caller`'s encrypted value.
    ///
    /// Fails with `AlreadyRegistered` if `caller` holds a record, and with
    /// `InvalidProof` if the engine rejects the input. Neither failure
    /// changes the ledger.
    pub fn register(
        &mut self,
        caller: Identity,
        ciphertext: CiphertextHandle,
        proof: &InputProof,
    ) -> RegistryResult<EventRecord> {
        if ciphertext.is_empty() {
            return Err(RegistryError::InvalidProof("Empty handle".into()));
        }
        if self.records.contains_key(&caller) {
            warn!(identity = %caller, "Rejected second registration");
            return Err(RegistryError::AlreadyRegistered(caller));
        }

        let verified = self
            .engine
            .verify_input(&ciphertext, proof, &caller, &self.address)
            .map_err(|e| RegistryError::InvalidProof(e.to_string()))?;

        self.engine.allow(&verified, &self.address, &self.address)?;
        self.engine.allow(&verified, &self.address, &caller)?;
        let sealed = self.engine.export_ciphertext(&verified)?;

        let record = EncryptedRecord::new(caller, verified);
        let event = self.next_event(RegistryEvent::BirthRegistered { identity: caller });

        self.journal.append(&JournalEntry {
            record: Some(record),
            sealed: Some(sealed),
            event: event.clone(),
        })?;

        self.records.insert(caller, record);
        self.events.push(event.clone());

        info!(identity = %caller, sequence = event.sequence, "Birth registered");
        Ok(event)
    }

    /// Let `viewer` decrypt `caller`'s value
    pub fn allow_viewer(&mut self, caller: Identity, viewer: Identity) -> RegistryResult<EventRecord> {
        let handle = self.get_encrypted(&caller);
        if handle.is_empty() {
            return Err(RegistryError::NoRecord(caller));
        }

        self.engine.allow(&handle, &self.address, &viewer)?;

        let event = self.next_event(RegistryEvent::ViewerAllowed { owner: caller, viewer });
        self.journal.append(&JournalEntry {
            record: None,
            sealed: None,
            event: event.clone(),
        })?;
        self.events.push(event.clone());

        debug!(owner = %caller, viewer = %viewer, "Viewer allowed");
        Ok(event)
    }

    /// Stored handle for `subject`, or the empty sentinel.
    ///
    /// Anyone may call this. It never fails.
    pub fn get_encrypted(&self, subject: &Identity) -> CiphertextHandle {
        self.records
            .get(subject)
            .map(|record| record.ciphertext)
            .unwrap_or(CiphertextHandle::EMPTY)
    }

    /// Whether `subject` holds a record
    pub fn is_registered(&self, subject: &Identity) -> bool {
        self.records.contains_key(subject)
    }

    /// Full record view for `subject`
    pub fn record(&self, subject: &Identity) -> EncryptedRecord {
        self.records
            .get(subject)
            .copied()
            .unwrap_or_else(|| EncryptedRecord::unregistered(*subject))
    }

    /// Number of registered identities
    pub fn registered_count(&self) -> usize {
        self.records.len()
    }

    /// Emitted events in order
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    fn next_event(&self, event: RegistryEvent) -> EventRecord {
        EventRecord {
            sequence: self.events.len() as u64,
            ledger: self.address,
            event,
        }
    }
}

impl<E: Engine, J: RegistryJournal> std::fmt::Debug for RegistrationLedger<E, J> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationLedger")
            .field("address", &self.address)
            .field("records", &self.records.len())
            .field("events", &self.events.len())
            .finish()
    }
}
