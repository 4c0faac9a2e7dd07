//! Property-Based Tests for the SoulSign Registry
//!
//! Uses proptest to generate identities and values and verify the ledger's
//! guarantees hold for all of them.

use proptest::prelude::*;
use soulsign_fhe::{Address, CiphertextHandle, FHEConfig, FHEServer};
use soulsign_registry::{AuthorizedDecryption, LedgerRuntime, RegistrationLedger, RegistryError};
use soulsign_wallet::{Keypair, Registrant};
use std::sync::Arc;

const NOW: u64 = 1_700_000_000;

// =============================================================================
// PROPTEST STRATEGIES
// =============================================================================

/// Strategy for generating random 32-byte arrays
fn bytes32() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

/// Two distinct signing secrets
fn two_secrets() -> impl Strategy<Value = ([u8; 32], [u8; 32])> {
    (bytes32(), bytes32()).prop_filter("secrets must differ", |(a, b)| a != b)
}

/// Zero handle spellings accepted at the text boundary
fn zero_spelling() -> impl Strategy<Value = String> {
    (0usize..=64, any::<bool>()).prop_map(|(len, prefixed)| {
        let body = "0".repeat(len);
        if prefixed {
            format!("0x{body}")
        } else {
            body
        }
    })
}

// =============================================================================
// FIXTURE
// =============================================================================

struct Ledger {
    engine: Arc<FHEServer>,
    runtime: LedgerRuntime<FHEServer>,
    gateway: AuthorizedDecryption<FHEServer>,
}

fn ledger() -> Ledger {
    let engine = Arc::new(FHEServer::generate(FHEConfig::default()));
    let address = Address::from_bytes([0x5e; 20]);
    Ledger {
        runtime: LedgerRuntime::new(RegistrationLedger::new(address, engine.clone())),
        gateway: AuthorizedDecryption::new(engine.clone(), address),
        engine,
    }
}

fn registrant(l: &Ledger, secret: &[u8; 32]) -> Registrant {
    Registrant::new(
        Keypair::from_secret_bytes(secret),
        l.runtime.address(),
        l.engine.public_key(),
        l.engine.config().chain_id,
    )
}

fn register(l: &Ledger, who: &Registrant, value: u32) -> Result<(), RegistryError> {
    let tx = who.register_tx(l.runtime.nonce(&who.identity()), value).unwrap();
    l.runtime.submit(&tx).map(|_| ())
}

fn decrypt(l: &Ledger, requester: &Registrant, subject: &Address) -> Result<Option<u32>, RegistryError> {
    let handle = l.runtime.get_encrypted(subject);
    let request = requester.decrypt_request(handle, NOW, 1);
    l.gateway.decrypt_registered(&l.runtime, subject, &request, NOW)
}

// =============================================================================
// LEDGER PROPERTY TESTS
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: a second registration always fails and leaves the first intact
    #[test]
    fn second_registration_never_overwrites(secret in bytes32(), first in any::<u32>(), second in any::<u32>()) {
        let l = ledger();
        let who = registrant(&l, &secret);

        register(&l, &who, first).unwrap();
        let stored = l.runtime.get_encrypted(&who.identity());

        prop_assert_eq!(
            register(&l, &who, second),
            Err(RegistryError::AlreadyRegistered(who.identity()))
        );
        prop_assert_eq!(l.runtime.get_encrypted(&who.identity()), stored);
        prop_assert_eq!(decrypt(&l, &who, &who.identity()).unwrap(), Some(first));
    }

    /// Property: registering one identity never changes another's read
    #[test]
    fn registrations_are_isolated((a, b) in two_secrets(), value in any::<u32>()) {
        let l = ledger();
        let alice = registrant(&l, &a);
        let bob = registrant(&l, &b);

        register(&l, &alice, value).unwrap();

        prop_assert!(l.runtime.get_encrypted(&bob.identity()).is_empty());
        prop_assert!(!l.runtime.is_registered(&bob.identity()));
        prop_assert_eq!(decrypt(&l, &bob, &bob.identity()).unwrap(), None);
    }

    /// Property: any registered value decrypts back for its owner
    #[test]
    fn owner_roundtrip(secret in bytes32(), value in any::<u32>()) {
        let l = ledger();
        let who = registrant(&l, &secret);

        register(&l, &who, value).unwrap();
        prop_assert!(!l.runtime.get_encrypted(&who.identity()).is_empty());
        prop_assert_eq!(decrypt(&l, &who, &who.identity()).unwrap(), Some(value));
    }

    /// Property: nobody but the owner decrypts without delegation
    #[test]
    fn strangers_are_denied((a, b) in two_secrets(), value in any::<u32>()) {
        let l = ledger();
        let alice = registrant(&l, &a);
        let eve = registrant(&l, &b);

        register(&l, &alice, value).unwrap();
        let denied = matches!(decrypt(&l, &eve, &alice.identity()), Err(RegistryError::DecryptionDenied(_)));
        prop_assert!(denied);
    }

    /// Property: the event log only grows, with contiguous sequence numbers
    #[test]
    fn event_log_is_append_only(secrets in prop::collection::vec(bytes32(), 1..6)) {
        let l = ledger();
        let mut seen = Vec::new();

        for secret in &secrets {
            let who = registrant(&l, secret);
            let _ = register(&l, &who, 19990521);

            let events = l.runtime.events_since(0);
            prop_assert!(events.len() >= seen.len());
            prop_assert_eq!(&events[..seen.len()], &seen[..]);
            seen = events;
        }

        for (i, record) in seen.iter().enumerate() {
            prop_assert_eq!(record.sequence, i as u64);
        }
    }
}

// =============================================================================
// HANDLE ENCODING PROPERTY TESTS
// =============================================================================

proptest! {
    /// Property: every zero spelling parses to the single sentinel
    #[test]
    fn zero_spellings_normalize(text in zero_spelling()) {
        prop_assert_eq!(CiphertextHandle::parse(&text).unwrap(), CiphertextHandle::EMPTY);
    }

    /// Property: non-zero handles survive hex text
    #[test]
    fn handle_hex_roundtrip(bytes in bytes32()) {
        let handle = CiphertextHandle::from_bytes(bytes);
        prop_assert_eq!(CiphertextHandle::parse(&handle.to_hex()).unwrap(), handle);
    }
}
