//! # Domain Entities for Persistence
//!
//! `WorldState` is the whole ledger at one height. Ordered maps make its
//! encoding, and therefore its hash, independent of insertion order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use shared_crypto::sha3_256;
use shared_types::{marshal, Actor, ActorType, Address, Amount, Hash, ParamValue, Pool};

use super::PersistenceError;

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    #[serde_as(as = "BTreeMap<_, DisplayFromStr>")]
    pub accounts: BTreeMap<Address, Amount>,
    #[serde_as(as = "BTreeMap<_, DisplayFromStr>")]
    pub pools: BTreeMap<Pool, Amount>,
    pub actors: BTreeMap<(ActorType, Address), Actor>,
    pub params: BTreeMap<String, ParamValue>,
}

impl WorldState {
    /// SHA3-256 over the canonical encoding.
    pub fn state_hash(&self) -> Result<Hash, PersistenceError> {
        Ok(sha3_256(&marshal(self)?))
    }

    /// Sum of every account and pool balance.
    pub fn total_supply(&self) -> Amount {
        self.accounts.values().chain(self.pools.values()).sum()
    }
}

/// Metadata stored for every committed height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub height: u64,
    pub proposer: Address,
    pub quorum_certificate: Vec<u8>,
    pub state_hash: Hash,
    pub tx_hashes: Vec<Hash>,
}

/// Outcome of an applied transaction, indexed on commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    pub tx_hash: Hash,
    pub height: u64,
    pub index: u32,
    pub signer: Address,
    pub message_type: String,
}
