//! Read and read-write views over ledger state bound to one height.
//!
//! Absent accounts and pools read as zero. Every call on a committed or
//! released context fails with `PersistenceError::ContextClosed`.

use shared_types::{Actor, ActorType, Address, Amount, Hash, ParamValue, Pool};

use crate::domain::{PersistenceError, TxResult};

pub trait PersistenceReadContext: Send {
    fn height(&self) -> u64;

    fn get_account_amount(&self, address: &Address) -> Result<Amount, PersistenceError>;

    fn get_pool_amount(&self, pool: Pool) -> Result<Amount, PersistenceError>;

    fn get_actor(
        &self,
        actor_type: ActorType,
        address: &Address,
    ) -> Result<Option<Actor>, PersistenceError>;

    /// All actors of a kind, ordered by address.
    fn get_actors(&self, actor_type: ActorType) -> Result<Vec<Actor>, PersistenceError>;

    /// Raw parameter value, `None` if the name was never set.
    fn get_parameter(&self, name: &str) -> Result<Option<ParamValue>, PersistenceError>;

    fn compute_state_hash(&self) -> Result<Hash, PersistenceError>;

    /// Whether a transaction with this hash was applied at or before this
    /// context's height. Read-write contexts include their pending index.
    fn transaction_exists(&self, tx_hash: &Hash) -> Result<bool, PersistenceError>;

    /// Drop the view. Idempotent.
    fn release(&mut self);
}

pub trait PersistenceRWContext: PersistenceReadContext {
    fn set_account_amount(&mut self, address: &Address, amount: Amount)
        -> Result<(), PersistenceError>;

    fn set_pool_amount(&mut self, pool: Pool, amount: Amount) -> Result<(), PersistenceError>;

    /// Fails with `ActorExists` if the kind/address pair is taken.
    fn insert_actor(&mut self, actor: Actor) -> Result<(), PersistenceError>;

    /// Fails with `ActorNotFound` if the record does not exist.
    fn update_actor(&mut self, actor: Actor) -> Result<(), PersistenceError>;

    fn delete_actor(
        &mut self,
        actor_type: ActorType,
        address: &Address,
    ) -> Result<(), PersistenceError>;

    fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<(), PersistenceError>;

    /// Record an applied transaction; indexed when the context commits.
    fn index_transaction(&mut self, result: TxResult) -> Result<(), PersistenceError>;

    /// Snapshot the working state under `name`.
    fn new_save_point(&mut self, name: &str) -> Result<(), PersistenceError>;

    /// Restore the snapshot taken under `name`, discarding it and every
    /// save point taken after it.
    fn rollback_to_save_point(&mut self, name: &str) -> Result<(), PersistenceError>;

    /// Discard the snapshot taken under `name` and every later one, keeping
    /// the working state as it is.
    fn release_save_point(&mut self, name: &str) -> Result<(), PersistenceError>;

    /// Number of live save points.
    fn save_point_depth(&self) -> usize;

    /// Persist the working state at this context's height and close it.
    fn commit(
        &mut self,
        proposer: Address,
        quorum_certificate: Vec<u8>,
    ) -> Result<(), PersistenceError>;
}
