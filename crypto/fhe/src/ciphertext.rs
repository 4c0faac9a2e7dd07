//! Sealed ciphertexts
//!
//! A client seals each 32-bit value to the engine's network key with an
//! ephemeral X25519 agreement, HKDF-SHA256 and ChaCha20-Poly1305. The
//! associated data binds the ciphertext to its destination contract, its
//! submitter, the chain and its position, so a sealed value replayed under any
//! other binding fails authentication.

use crate::address::Address;
use crate::handle::FheType;
use crate::keys::{NetworkKeyPair, NetworkPublicKey};
use crate::{FHEError, FHEResult};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey};
use zeroize::Zeroizing;

/// Nonce size for ChaCha20-Poly1305
const NONCE_SIZE: usize = 12;

/// Poly1305 tag overhead
const AEAD_TAG_SIZE: usize = 16;

/// HKDF label for the sealing key
const SEAL_KEY_LABEL: &[u8] = b"soulsign_seal_key_v1";

/// Where a sealed value is allowed to be used
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Destination contract
    pub contract: Address,
    /// Submitting account
    pub user: Address,
    /// Chain id
    pub chain_id: u64,
    /// Position inside the encrypted input
    pub index: u8,
}

impl Binding {
    fn associated_data(&self, fhe_type: FheType) -> Vec<u8> {
        let mut aad = Vec::with_capacity(20 + 20 + 8 + 2);
        aad.extend_from_slice(self.contract.as_bytes());
        aad.extend_from_slice(self.user.as_bytes());
        aad.extend_from_slice(&self.chain_id.to_be_bytes());
        aad.push(self.index);
        aad.push(fhe_type.as_byte());
        aad
    }
}

/// One value sealed to the engine
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedCiphertext {
    /// Encrypted type
    pub fhe_type: FheType,
    /// Client's ephemeral X25519 public key
    pub ephemeral_public: [u8; 32],
    /// AEAD nonce
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext and tag
    pub payload: Vec<u8>,
}

impl SealedCiphertext {
    /// Seal a `u32` for the engine under `binding`
    pub fn seal_u32(value: u32, engine: &NetworkPublicKey, binding: &Binding) -> FHEResult<Self> {
        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let ephemeral_public = X25519PublicKey::from(&ephemeral).to_bytes();
        let shared = Zeroizing::new(ephemeral.diffie_hellman(&engine.to_x25519()).to_bytes());

        let key = derive_seal_key(&shared, &ephemeral_public)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_slice()));

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let fhe_type = FheType::Euint32;
        let aad = binding.associated_data(fhe_type);
        let plaintext = Zeroizing::new(value.to_le_bytes());
        let payload = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_slice(),
                    aad: &aad,
                },
            )
            .map_err(|_| FHEError::EncryptionFailed("AEAD seal failed".into()))?;

        Ok(Self {
            fhe_type,
            ephemeral_public,
            nonce,
            payload,
        })
    }

    /// Open with the engine key. Fails if the binding does not match the one
    /// used at seal time.
    pub(crate) fn open_u32(&self, keys: &NetworkKeyPair, binding: &Binding) -> FHEResult<u32> {
        if self.fhe_type != FheType::Euint32 {
            return Err(FHEError::DecryptionFailed("Not an euint32 ciphertext".into()));
        }
        if self.payload.len() != 4 + AEAD_TAG_SIZE {
            return Err(FHEError::DecryptionFailed(format!(
                "Unexpected payload size {}",
                self.payload.len()
            )));
        }

        let shared = keys.agree(&self.ephemeral_public);
        let key = derive_seal_key(&shared, &self.ephemeral_public)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_slice()));

        let aad = binding.associated_data(self.fhe_type);
        let plaintext = Zeroizing::new(
            cipher
                .decrypt(
                    Nonce::from_slice(&self.nonce),
                    Payload {
                        msg: &self.payload,
                        aad: &aad,
                    },
                )
                .map_err(|_| FHEError::DecryptionFailed("AEAD authentication failed".into()))?,
        );

        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&plaintext);
        Ok(u32::from_le_bytes(bytes))
    }

    /// Digest committed to by the value's handle
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[self.fhe_type.as_byte()]);
        hasher.update(&self.ephemeral_public);
        hasher.update(&self.nonce);
        hasher.update(&self.payload);
        *hasher.finalize().as_bytes()
    }
}

impl std::fmt::Debug for SealedCiphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedCiphertext")
            .field("type", &self.fhe_type)
            .field("size", &self.payload.len())
            .finish()
    }
}

fn derive_seal_key(shared: &[u8; 32], ephemeral_public: &[u8; 32]) -> FHEResult<Zeroizing<[u8; 32]>> {
    let hkdf = Hkdf::<Sha256>::new(Some(ephemeral_public), shared);
    let mut key = Zeroizing::new([0u8; 32]);
    hkdf.expand(SEAL_KEY_LABEL, key.as_mut_slice())
        .map_err(|e| FHEError::InvalidKey(e.to_string()))?;
    Ok(key)
}
