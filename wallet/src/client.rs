//! Client-side request building
//!
//! Everything a registrant produces before talking to a ledger: the sealed
//! birth value with its proof, signed transactions and signed decryption
//! requests. Plaintext never leaves this side except inside a seal.

use crate::{Keypair, WalletResult};
use soulsign_fhe::{
    Address, CiphertextHandle, EncryptedInput, EncryptedInputBuilder, NetworkPublicKey, SignedDecryptRequest,
    UserDecryptRequest,
};
use soulsign_registry::{Call, Identity, SignedTransaction, Transaction};

/// A registrant bound to one ledger and its engine
pub struct Registrant {
    keypair: Keypair,
    ledger: Address,
    engine_key: NetworkPublicKey,
    chain_id: u64,
}

impl Registrant {
    pub fn new(keypair: Keypair, ledger: Address, engine_key: NetworkPublicKey, chain_id: u64) -> Self {
        Self {
            keypair,
            ledger,
            engine_key,
            chain_id,
        }
    }

    pub fn identity(&self) -> Identity {
        self.keypair.identity()
    }

    pub fn ledger(&self) -> Address {
        self.ledger
    }

    /// Seal a packed `YYYYMMDD` value for this registrant and ledger
    pub fn encrypt_birth(&self, packed: u32) -> WalletResult<EncryptedInput> {
        let input = EncryptedInputBuilder::new(self.engine_key, self.ledger, self.identity(), self.chain_id)
            .add32(packed)
            .encrypt()?;
        Ok(input)
    }

    /// Signed registration carrying a freshly sealed value
    pub fn register_tx(&self, nonce: u64, packed: u32) -> WalletResult<SignedTransaction> {
        let input = self.encrypt_birth(packed)?;
        let call = Call::Register {
            ciphertext: input.handles[0],
            proof: input.input_proof,
        };
        self.sign(nonce, call)
    }

    /// Signed delegation to `viewer`
    pub fn allow_viewer_tx(&self, nonce: u64, viewer: Identity) -> WalletResult<SignedTransaction> {
        self.sign(nonce, Call::AllowViewer { viewer })
    }

    /// Signed request to decrypt `handle` from `start` for `days`
    pub fn decrypt_request(&self, handle: CiphertextHandle, start: u64, days: u32) -> SignedDecryptRequest {
        UserDecryptRequest::new(handle, self.ledger, self.identity(), start, days).sign(self.keypair.signing_key())
    }

    fn sign(&self, nonce: u64, call: Call) -> WalletResult<SignedTransaction> {
        Ok(Transaction::new(self.ledger, nonce, call).sign(self.keypair.signing_key())?)
    }
}
