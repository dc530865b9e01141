//! # Inbound Port - TxMempool
//!
//! Driving port used by transaction admission (writers) and by the leader's
//! proposal builder (reader). Implementations must be safe to share across
//! threads; none of the methods block beyond a short internal lock.

use crate::domain::{Hash, MempoolError, TxFifoMempool};

/// Pool of pending transactions in arrival order.
pub trait TxMempool: Send + Sync {
    /// Admit raw transaction bytes, returning their content hash.
    ///
    /// # Errors
    /// - `DuplicateTransaction`: a transaction with the same hash is pooled
    fn add_tx(&self, tx: Vec<u8>) -> Result<Hash, MempoolError>;

    /// Remove and return the oldest transaction.
    ///
    /// # Errors
    /// - `EmptyPool`: nothing to pop
    fn pop_tx(&self) -> Result<Vec<u8>, MempoolError>;

    /// Remove a transaction if present.
    fn remove_tx(&self, tx: &[u8]) -> bool;

    fn contains(&self, hash: &Hash) -> bool;

    fn is_empty(&self) -> bool;

    fn clear(&self);

    fn tx_count(&self) -> usize;

    fn total_bytes(&self) -> u64;
}

impl TxMempool for TxFifoMempool {
    fn add_tx(&self, tx: Vec<u8>) -> Result<Hash, MempoolError> {
        TxFifoMempool::add_tx(self, tx)
    }

    fn pop_tx(&self) -> Result<Vec<u8>, MempoolError> {
        TxFifoMempool::pop_tx(self)
    }

    fn remove_tx(&self, tx: &[u8]) -> bool {
        TxFifoMempool::remove_tx(self, tx)
    }

    fn contains(&self, hash: &Hash) -> bool {
        TxFifoMempool::contains(self, hash)
    }

    fn is_empty(&self) -> bool {
        TxFifoMempool::is_empty(self)
    }

    fn clear(&self) {
        TxFifoMempool::clear(self)
    }

    fn tx_count(&self) -> usize {
        TxFifoMempool::tx_count(self)
    }

    fn total_bytes(&self) -> u64 {
        TxFifoMempool::total_bytes(self)
    }
}
