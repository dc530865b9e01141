//! # Shared Crypto
//!
//! Cryptographic primitives used by the state-transition engine.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA3-256 | Transaction hashes, state commitments |
//! | `hashing` | SHA-256 | Address derivation from public keys |
//! | `signatures` | Ed25519 | Transaction signing and verification |
//!
//! An address is the first 20 bytes of `SHA-256(public_key)`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{address_from_public_key, sha3_256, Sha3Hasher, ADDRESS_LEN, HASH_LEN};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, PUBLIC_KEY_LEN, SIGNATURE_LEN};
