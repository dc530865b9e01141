//! Metrics collection for the utility subsystem

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the service and every unit of work it creates
#[derive(Debug, Default)]
pub struct Metrics {
    /// Transactions admitted to the mempool
    pub transactions_admitted: AtomicU64,

    /// Transactions applied inside a block
    pub transactions_applied: AtomicU64,

    /// Transactions dropped while building a proposal
    pub transactions_rejected: AtomicU64,

    /// Proposals rejected by a replica
    pub proposals_rejected: AtomicU64,

    /// Units of work committed
    pub blocks_committed: AtomicU64,

    /// Units of work released without commit
    pub blocks_released: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_admitted(&self) {
        self.transactions_admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_applied(&self) {
        self.transactions_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.transactions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_proposal_rejected(&self) {
        self.proposals_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_committed(&self) {
        self.blocks_committed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_released(&self) {
        self.blocks_released.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_blocks_committed(&self) -> u64 {
        self.blocks_committed.load(Ordering::Relaxed)
    }

    pub fn get_transactions_applied(&self) -> u64 {
        self.transactions_applied.load(Ordering::Relaxed)
    }

    /// Average applied transactions per committed block
    pub fn get_avg_transactions_per_block(&self) -> f64 {
        let blocks = self.blocks_committed.load(Ordering::Relaxed);
        if blocks == 0 {
            return 0.0;
        }
        let txs = self.transactions_applied.load(Ordering::Relaxed);
        txs as f64 / blocks as f64
    }
}
