//! Ed25519 keys in their Stellar form.
//!
//! `PublicKey` is the 32-byte account identity rendered as a `G…` StrKey;
//! `KeyPair` adds an optional signing key (rendered as an `S…` seed).

pub mod keypair;
pub mod public_key;

pub use keypair::KeyPair;
pub use public_key::PublicKey;
