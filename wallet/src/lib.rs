//! SoulSign Wallet
//!
//! Registrant-side tooling:
//! - Ed25519 keypairs whose address is the registry identity
//! - JSON keystore files
//! - Sealing birth values and building signed transactions and
//!   decryption requests

pub mod client;
pub mod keypair;
pub mod keystore;
mod error;

pub use client::Registrant;
pub use error::{WalletError, WalletResult};
pub use keypair::Keypair;
pub use keystore::{Keystore, KEYSTORE_VERSION};
