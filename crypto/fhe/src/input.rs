//! Client-side encrypted inputs
//!
//! ```text
//! let input = EncryptedInputBuilder::new(engine_pk, ledger, user, chain_id)
//!     .add32(19990521)
//!     .encrypt()?;
//! // submit input.handles[0] together with input.input_proof
//! ```

use crate::address::Address;
use crate::ciphertext::{Binding, SealedCiphertext};
use crate::handle::CiphertextHandle;
use crate::keys::NetworkPublicKey;
use crate::{FHEError, FHEResult};
use serde::{Deserialize, Serialize};

/// Proof encoding version
const PROOF_VERSION: u8 = 1;

/// Maximum number of values in one encrypted input
pub const MAX_INPUTS: usize = 32;

/// Opaque proof bytes accompanying one or more handles
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(Vec<u8>);

impl InputProof {
    /// Wrap raw proof bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw proof bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex encoding with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// Parse from hex
    pub fn from_hex(s: &str) -> FHEResult<Self> {
        let body = s.trim().trim_start_matches("0x");
        hex::decode(body)
            .map(Self)
            .map_err(|e| FHEError::InvalidProof(e.to_string()))
    }

    pub(crate) fn decode(&self) -> FHEResult<ProofPayload> {
        let payload: ProofPayload = bincode::deserialize(&self.0)
            .map_err(|e| FHEError::InvalidProof(format!("Malformed proof: {e}")))?;

        if payload.version != PROOF_VERSION {
            return Err(FHEError::InvalidProof(format!(
                "Unsupported proof version {}",
                payload.version
            )));
        }
        if payload.ciphertexts.is_empty() || payload.ciphertexts.len() > MAX_INPUTS {
            return Err(FHEError::InvalidProof(format!(
                "Proof carries {} ciphertexts",
                payload.ciphertexts.len()
            )));
        }
        Ok(payload)
    }
}

impl std::fmt::Debug for InputProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputProof")
            .field("size", &self.0.len())
            .finish()
    }
}

/// Decoded proof contents
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct ProofPayload {
    pub version: u8,
    pub contract: Address,
    pub user: Address,
    pub chain_id: u64,
    pub ciphertexts: Vec<SealedCiphertext>,
}

impl ProofPayload {
    /// Binding of the value at `index`
    pub fn binding(&self, index: u8) -> Binding {
        Binding {
            contract: self.contract,
            user: self.user,
            chain_id: self.chain_id,
            index,
        }
    }
}

/// Handles plus the proof that covers them
#[derive(Clone, Debug)]
pub struct EncryptedInput {
    /// One handle per added value, in insertion order
    pub handles: Vec<CiphertextHandle>,
    /// Proof to submit alongside the handles
    pub input_proof: InputProof,
}

/// Builds an encrypted input bound to (contract, user)
pub struct EncryptedInputBuilder {
    engine: NetworkPublicKey,
    contract: Address,
    user: Address,
    chain_id: u64,
    values: Vec<u32>,
}

impl EncryptedInputBuilder {
    /// Start an input for `user` submitting to `contract`
    pub fn new(engine: NetworkPublicKey, contract: Address, user: Address, chain_id: u64) -> Self {
        Self {
            engine,
            contract,
            user,
            chain_id,
            values: Vec::new(),
        }
    }

    /// Add a 32-bit value
    pub fn add32(&mut self, value: u32) -> &mut Self {
        self.values.push(value);
        self
    }

    /// Seal all values and produce handles and proof
    pub fn encrypt(&self) -> FHEResult<EncryptedInput> {
        if self.values.is_empty() {
            return Err(FHEError::EncryptionFailed("No values added".into()));
        }
        if self.values.len() > MAX_INPUTS {
            return Err(FHEError::TooManyInputs { max: MAX_INPUTS });
        }

        let mut handles = Vec::with_capacity(self.values.len());
        let mut ciphertexts = Vec::with_capacity(self.values.len());

        for (index, value) in self.values.iter().enumerate() {
            let index = index as u8;
            let binding = Binding {
                contract: self.contract,
                user: self.user,
                chain_id: self.chain_id,
                index,
            };
            let sealed = SealedCiphertext::seal_u32(*value, &self.engine, &binding)?;
            handles.push(CiphertextHandle::derive(
                &sealed.digest(),
                index,
                self.chain_id,
                sealed.fhe_type,
            ));
            ciphertexts.push(sealed);
        }

        let payload = ProofPayload {
            version: PROOF_VERSION,
            contract: self.contract,
            user: self.user,
            chain_id: self.chain_id,
            ciphertexts,
        };

        Ok(EncryptedInput {
            handles,
            input_proof: InputProof(bincode::serialize(&payload)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::NetworkKeyPair;

    #[test]
    fn test_one_handle_per_value() {
        let keys = NetworkKeyPair::generate();
        let input = EncryptedInputBuilder::new(
            keys.public(),
            Address::from_bytes([1u8; 20]),
            Address::from_bytes([2u8; 20]),
            7,
        )
        .add32(1)
        .add32(2)
        .encrypt()
        .unwrap();

        assert_eq!(input.handles.len(), 2);
        assert_eq!(input.handles[0].index(), 0);
        assert_eq!(input.handles[1].index(), 1);
        assert!(input.handles.iter().all(|h| h.chain_id() == 7));

        let payload = input.input_proof.decode().unwrap();
        assert_eq!(payload.ciphertexts.len(), 2);
    }

    #[test]
    fn test_empty_builder_fails() {
        let keys = NetworkKeyPair::generate();
        let builder = EncryptedInputBuilder::new(keys.public(), Address::ZERO, Address::ZERO, 1);
        assert!(builder.encrypt().is_err());
    }

    #[test]
    fn test_garbage_proof_rejected() {
        let proof = InputProof::from_bytes(vec![0xff; 10]);
        assert!(matches!(proof.decode(), Err(FHEError::InvalidProof(_))));
    }
}
