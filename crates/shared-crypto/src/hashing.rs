//! # Hashing
//!
//! SHA3-256 for content hashes and SHA-256 for address derivation.

use sha2::Sha256;
use sha3::{Digest, Sha3_256};

/// Length of a content hash in bytes.
pub const HASH_LEN: usize = 32;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Stateful SHA3-256 hasher.
pub struct Sha3Hasher {
    inner: Sha3_256,
}

impl Sha3Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha3_256::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> [u8; HASH_LEN] {
        self.inner.finalize().into()
    }
}

impl Default for Sha3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with SHA3-256 (one-shot).
pub fn sha3_256(data: &[u8]) -> [u8; HASH_LEN] {
    Sha3_256::digest(data).into()
}

/// Derive the 20-byte account address owned by a public key.
pub fn address_from_public_key(public_key: &[u8]) -> [u8; ADDRESS_LEN] {
    let digest = Sha256::digest(public_key);
    let mut address = [0u8; ADDRESS_LEN];
    address.copy_from_slice(&digest[..ADDRESS_LEN]);
    address
}
