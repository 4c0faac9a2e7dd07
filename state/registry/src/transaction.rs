//! Signed ledger transactions and their receipts

use crate::{Identity, RegistryError, RegistryResult};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use soulsign_fhe::{Address, CiphertextHandle, InputProof};

/// Domain separator for transaction hashes
const TX_DOMAIN: &[u8] = b"soulsign_tx_v1";

/// State-changing ledger operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    /// Register the sender's encrypted value
    Register {
        ciphertext: CiphertextHandle,
        proof: InputProof,
    },
    /// Let `viewer` decrypt the sender's value
    AllowViewer { viewer: Identity },
}

/// Unsigned transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Ledger the transaction is meant for
    pub to: Address,
    /// Sender's transaction count
    pub nonce: u64,
    /// Operation
    pub call: Call,
}

impl Transaction {
    pub fn new(to: Address, nonce: u64, call: Call) -> Self {
        Self { to, nonce, call }
    }

    /// Hash covered by the signature
    pub fn hash(&self) -> RegistryResult<[u8; 32]> {
        let encoded = bincode::serialize(self)?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(TX_DOMAIN);
        hasher.update(&encoded);
        Ok(*hasher.finalize().as_bytes())
    }

    /// Sign with the sender's key
    pub fn sign(self, key: &SigningKey) -> RegistryResult<SignedTransaction> {
        let signature = key.sign(&self.hash()?);
        Ok(SignedTransaction {
            transaction: self,
            public_key: key.verifying_key().to_bytes(),
            signature: signature.to_bytes().to_vec(),
        })
    }
}

/// Transaction plus the sender's signature
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    /// Sender's Ed25519 verifying key
    pub public_key: [u8; 32],
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    /// Verify the signature and return the authenticated sender
    pub fn sender(&self) -> RegistryResult<Identity> {
        let key = VerifyingKey::from_bytes(&self.public_key)
            .map_err(|e| RegistryError::InvalidSignature(format!("Bad verifying key: {e}")))?;
        let signature = Signature::from_slice(&self.signature)
            .map_err(|e| RegistryError::InvalidSignature(format!("Malformed signature: {e}")))?;

        key.verify(&self.transaction.hash()?, &signature)
            .map_err(|_| RegistryError::InvalidSignature("Signature verification failed".into()))?;

        Ok(Address::from_verifying_key(&key))
    }

    /// Hash of the unsigned transaction
    pub fn hash(&self) -> RegistryResult<[u8; 32]> {
        self.transaction.hash()
    }

    pub fn to_bytes(&self) -> RegistryResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> RegistryResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Log entry emitted by a transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLog {
    /// Emitting ledger
    pub contract: Address,
    /// Event signature hash followed by indexed identities
    pub topics: Vec<[u8; 32]>,
    /// Unindexed payload
    pub data: Vec<u8>,
}

/// Outcome of an applied transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub tx_hash: [u8; 32],
    /// Sequence of the event the transaction emitted
    pub sequence: u64,
    pub sender: Identity,
    pub logs: Vec<TransactionLog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            Address::from_bytes([1u8; 20]),
            0,
            Call::AllowViewer {
                viewer: Address::from_bytes([2u8; 20]),
            },
        )
    }

    #[test]
    fn test_sender_is_signer_address() {
        let key = SigningKey::from_bytes(&[3u8; 32]);
        let signed = sample().sign(&key).unwrap();
        assert_eq!(
            signed.sender().unwrap(),
            Address::from_verifying_key(&key.verifying_key())
        );
    }

    #[test]
    fn test_tampered_transaction_rejected() {
        let key = SigningKey::from_bytes(&[3u8; 32]);
        let mut signed = sample().sign(&key).unwrap();
        signed.transaction.nonce = 1;
        assert!(matches!(signed.sender(), Err(RegistryError::InvalidSignature(_))));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let key = SigningKey::from_bytes(&[3u8; 32]);
        let signed = sample().sign(&key).unwrap();
        let decoded = SignedTransaction::from_bytes(&signed.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, signed);
    }
}
