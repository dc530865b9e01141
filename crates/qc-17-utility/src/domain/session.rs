//! # Sessions
//!
//! A session pairs one application with the servicers and fishermen that
//! serve it on one relay chain for `blocks_per_session` blocks. Everything
//! here is pure: given the same start height, seed hash and actor sets,
//! every node derives the same session.
//!
//! ```text
//! id        = SHA3-256(start_height_le ‖ prev_block_hash ‖ relay_chain ‖ app_public_key)
//! pick i    : index = u64_be(key[..8]) mod remaining
//! next key  = SHA3-256(key ‖ picked.public_key)
//! ```

use shared_crypto::Sha3Hasher;
use shared_types::{Actor, Hash, StakeStatus};

/// Actors dispatched to one application for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Hash,
    /// First height of the session.
    pub height: u64,
    pub session_number: u64,
    pub relay_chain: String,
    pub application: Actor,
    pub servicers: Vec<Actor>,
    pub fishermen: Vec<Actor>,
}

/// `(start_height, session_number)` of the session containing `height`.
/// A zero session length is treated as one block.
pub fn session_start(height: u64, blocks_per_session: u64) -> (u64, u64) {
    let length = blocks_per_session.max(1);
    let number = height / length;
    (number * length, number)
}

pub fn session_id(
    start_height: u64,
    prev_block_hash: &Hash,
    relay_chain: &str,
    app_public_key: &[u8],
) -> Hash {
    let mut hasher = Sha3Hasher::new();
    hasher
        .update(&start_height.to_le_bytes())
        .update(prev_block_hash)
        .update(relay_chain.as_bytes())
        .update(app_public_key);
    hasher.finalize()
}

/// Staked, unpaused and serving `relay_chain`.
pub fn can_serve(actor: &Actor, relay_chain: &str) -> bool {
    actor.status == StakeStatus::Staked
        && !actor.is_paused()
        && actor.chains.iter().any(|chain| chain == relay_chain)
}

/// Pick `count` distinct actors, re-hashing the key after every pick so
/// each choice depends on the ones before it. Returns every candidate,
/// in order, when there are not enough of them.
pub fn select_actors(mut candidates: Vec<Actor>, count: usize, seed: &Hash) -> Vec<Actor> {
    if count >= candidates.len() {
        return candidates;
    }
    let mut key = *seed;
    let mut selected = Vec::with_capacity(count);
    while selected.len() < count {
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&key[..8]);
        let remaining = candidates.len() as u64;
        let index = (u64::from_be_bytes(prefix) % remaining) as usize;
        let actor = candidates.remove(index);

        let mut hasher = Sha3Hasher::new();
        hasher.update(&key).update(&actor.public_key);
        key = hasher.finalize();
        selected.push(actor);
    }
    selected
}
