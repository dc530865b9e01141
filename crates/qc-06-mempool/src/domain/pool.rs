//! Bounded FIFO transaction pool.

use parking_lot::Mutex;
use shared_types::transaction_hash;
use tracing::{debug, warn};

use super::{FifoSet, Hash, MempoolConfig, MempoolError, MempoolStatus};

#[derive(Debug, Default)]
struct Inner {
    txs: FifoSet<Hash, Vec<u8>>,
    tx_count: usize,
    total_bytes: u64,
}

impl Inner {
    fn on_added(&mut self, len: usize) {
        self.tx_count += 1;
        self.total_bytes += len as u64;
    }

    fn on_removed(&mut self, len: usize) {
        self.tx_count -= 1;
        self.total_bytes -= len as u64;
    }
}

/// Thread-safe mempool of raw transaction bytes keyed by content hash.
///
/// Every operation takes the single internal lock, so counters are always
/// consistent with membership as observed by any caller.
#[derive(Debug)]
pub struct TxFifoMempool {
    config: MempoolConfig,
    inner: Mutex<Inner>,
}

impl TxFifoMempool {
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn config(&self) -> &MempoolConfig {
        &self.config
    }

    /// Insert at the tail, then evict from the head until within limits.
    pub fn add_tx(&self, tx: Vec<u8>) -> Result<Hash, MempoolError> {
        let hash = transaction_hash(&tx);
        let len = tx.len();

        let mut inner = self.inner.lock();
        if inner.txs.push_back(hash, tx).is_err() {
            return Err(MempoolError::DuplicateTransaction(hash));
        }
        inner.on_added(len);
        self.evict_overflow(&mut inner, &hash);

        Ok(hash)
    }

    fn evict_overflow(&self, inner: &mut Inner, inserted: &Hash) {
        while inner.tx_count > self.config.max_transactions
            || inner.total_bytes > self.config.max_total_bytes
        {
            let Some((hash, bytes)) = inner.txs.pop_front() else {
                break;
            };
            inner.on_removed(bytes.len());
            if &hash == inserted {
                warn!(
                    tx_hash = %hex::encode(hash),
                    size = bytes.len(),
                    max_total_bytes = self.config.max_total_bytes,
                    "[qc-06] Transaction evicted itself on insertion"
                );
            } else {
                debug!(tx_hash = %hex::encode(hash), "[qc-06] Evicted oldest transaction");
            }
        }
    }

    /// Remove and return the oldest transaction.
    pub fn pop_tx(&self) -> Result<Vec<u8>, MempoolError> {
        let mut inner = self.inner.lock();
        let (_, bytes) = inner.txs.pop_front().ok_or(MempoolError::EmptyPool)?;
        inner.on_removed(bytes.len());
        Ok(bytes)
    }

    /// Remove a transaction by content. Returns whether it was present.
    pub fn remove_tx(&self, tx: &[u8]) -> bool {
        let hash = transaction_hash(tx);
        let mut inner = self.inner.lock();
        match inner.txs.remove(&hash) {
            Some(bytes) => {
                inner.on_removed(bytes.len());
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.inner.lock().txs.contains(hash)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().tx_count == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.txs.clear();
        inner.tx_count = 0;
        inner.total_bytes = 0;
    }

    pub fn tx_count(&self) -> usize {
        self.inner.lock().tx_count
    }

    pub fn total_bytes(&self) -> u64 {
        self.inner.lock().total_bytes
    }

    /// Count and bytes read under one lock acquisition.
    pub fn status(&self) -> MempoolStatus {
        let inner = self.inner.lock();
        MempoolStatus {
            tx_count: inner.tx_count,
            total_bytes: inner.total_bytes,
        }
    }

    /// Copies of all pooled transactions from oldest to newest.
    pub fn snapshot(&self) -> Vec<Vec<u8>> {
        self.inner.lock().txs.values().cloned().collect()
    }
}

impl Default for TxFifoMempool {
    fn default() -> Self {
        Self::new(MempoolConfig::default())
    }
}
