//! Registry events
//!
//! Events name identities only. They never carry a handle or a value.

use crate::transaction::TransactionLog;
use crate::Identity;
use serde::{Deserialize, Serialize};
use soulsign_fhe::Address;

/// Indexer signature of the registration event
pub const BIRTH_REGISTERED_SIGNATURE: &str = "BirthRegistered(address)";

/// Indexer signature of the delegation event
pub const VIEWER_ALLOWED_SIGNATURE: &str = "ViewerAllowed(address,address)";

/// Something observable that happened on the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// `identity` registered its encrypted value
    BirthRegistered { identity: Identity },
    /// `owner` let `viewer` decrypt its value
    ViewerAllowed { owner: Identity, viewer: Identity },
}

impl RegistryEvent {
    /// Identity whose transaction produced the event
    pub fn actor(&self) -> Identity {
        match self {
            RegistryEvent::BirthRegistered { identity } => *identity,
            RegistryEvent::ViewerAllowed { owner, .. } => *owner,
        }
    }

    /// Hash of the event signature, first log topic
    pub fn topic(&self) -> [u8; 32] {
        let signature = match self {
            RegistryEvent::BirthRegistered { .. } => BIRTH_REGISTERED_SIGNATURE,
            RegistryEvent::ViewerAllowed { .. } => VIEWER_ALLOWED_SIGNATURE,
        };
        *blake3::hash(signature.as_bytes()).as_bytes()
    }

    fn indexed(&self) -> Vec<Identity> {
        match self {
            RegistryEvent::BirthRegistered { identity } => vec![*identity],
            RegistryEvent::ViewerAllowed { owner, viewer } => vec![*owner, *viewer],
        }
    }
}

/// Event with its position in the ledger's log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0
    pub sequence: u64,
    /// Ledger that emitted it
    pub ledger: Address,
    /// The event
    pub event: RegistryEvent,
}

impl EventRecord {
    /// Render as an indexer log entry
    pub fn to_log(&self) -> TransactionLog {
        let mut topics = vec![self.event.topic()];
        topics.extend(self.event.indexed().iter().map(pad_topic));
        TransactionLog {
            contract: self.ledger,
            topics,
            data: Vec::new(),
        }
    }
}

/// Left-pad an address into a 32-byte topic
fn pad_topic(identity: &Identity) -> [u8; 32] {
    let mut topic = [0u8; 32];
    topic[12..].copy_from_slice(identity.as_bytes());
    topic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_topics() {
        let identity = Address::from_bytes([7u8; 20]);
        let record = EventRecord {
            sequence: 0,
            ledger: Address::from_bytes([1u8; 20]),
            event: RegistryEvent::BirthRegistered { identity },
        };

        let log = record.to_log();
        assert_eq!(log.contract, record.ledger);
        assert_eq!(log.topics.len(), 2);
        assert_eq!(log.topics[0], *blake3::hash(b"BirthRegistered(address)").as_bytes());
        assert_eq!(&log.topics[1][12..], identity.as_bytes());
        assert!(log.data.is_empty());
    }

    #[test]
    fn test_actor() {
        let owner = Address::from_bytes([1u8; 20]);
        let viewer = Address::from_bytes([2u8; 20]);
        assert_eq!(RegistryEvent::ViewerAllowed { owner, viewer }.actor(), owner);
    }
}
