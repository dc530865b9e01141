//! Mempool configuration and status snapshot.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_MAX_TOTAL_BYTES, DEFAULT_MAX_TRANSACTIONS};

/// Capacity limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MempoolConfig {
    /// Maximum number of transactions held.
    pub max_transactions: usize,
    /// Maximum aggregate size of held transactions in bytes.
    pub max_total_bytes: u64,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            max_transactions: DEFAULT_MAX_TRANSACTIONS,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
        }
    }
}

impl MempoolConfig {
    /// Config with explicit limits.
    pub fn new(max_transactions: usize, max_total_bytes: u64) -> Self {
        Self {
            max_transactions,
            max_total_bytes,
        }
    }
}

/// Point-in-time view of pool occupancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MempoolStatus {
    pub tx_count: usize,
    pub total_bytes: u64,
}
