/// Stellar SDK - Cryptographic primitives, hashing, and utilities.
///
/// This crate provides the foundational building blocks for the Stellar SDK:
/// - SHA-256 hashing
/// - StrKey encoding for account ids, seeds, muxed accounts and signer keys
/// - Ed25519 public keys and key pairs
/// - Network passphrases and network ids
/// - Big-endian XDR readers and writers

pub mod hash;
pub mod keys;
pub mod network;
pub mod strkey;
pub mod util;

mod error;
pub use error::PrimitivesError;
pub use keys::{KeyPair, PublicKey};
pub use network::Network;
