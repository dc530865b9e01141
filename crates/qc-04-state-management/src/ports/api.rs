use shared_types::Hash;

use super::{PersistenceRWContext, PersistenceReadContext};
use crate::domain::{BlockRecord, PersistenceError};

/// Entry point to persistence.
pub trait PersistenceModule: Send + Sync {
    /// View of committed state as of `height`.
    fn new_read_context(
        &self,
        height: u64,
    ) -> Result<Box<dyn PersistenceReadContext>, PersistenceError>;

    /// Writable working copy of the latest committed state, to be committed
    /// at `height`. Fails while another read-write context is open.
    fn new_rw_context(
        &self,
        height: u64,
    ) -> Result<Box<dyn PersistenceRWContext>, PersistenceError>;

    fn latest_height(&self) -> Result<u64, PersistenceError>;

    /// Whether a transaction with this hash was committed at any height.
    fn transaction_exists(&self, tx_hash: &Hash) -> Result<bool, PersistenceError>;

    fn get_block(&self, height: u64) -> Result<Option<BlockRecord>, PersistenceError>;
}
