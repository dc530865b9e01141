//! Configuration types for the utility subsystem

use std::env;

use qc_06_mempool::MempoolConfig;
use serde::Deserialize;

use crate::error::{Result, UtilityError};

/// Runtime configuration for the utility service
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UtilityConfig {
    /// Mempool capacity limits
    pub mempool: MempoolConfig,

    /// Upper bound on transaction bytes in one proposal
    pub max_block_transaction_bytes: u64,
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self {
            mempool: MempoolConfig::default(),
            max_block_transaction_bytes: crate::DEFAULT_MAX_BLOCK_TRANSACTION_BYTES,
        }
    }
}

impl UtilityConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_MEMPOOL_MAX_TRANSACTIONS`: pooled transaction limit (default: 9000)
    /// - `QC_MEMPOOL_MAX_TOTAL_BYTES`: pooled byte limit (default: 1 GiB)
    /// - `QC_MAX_BLOCK_TX_BYTES`: proposal byte limit (default: 4 MiB)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            mempool: MempoolConfig {
                max_transactions: env::var("QC_MEMPOOL_MAX_TRANSACTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.mempool.max_transactions),
                max_total_bytes: env::var("QC_MEMPOOL_MAX_TOTAL_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.mempool.max_total_bytes),
            },
            max_block_transaction_bytes: env::var("QC_MAX_BLOCK_TX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_block_transaction_bytes),
        }
    }

    /// Reject zero limits.
    pub fn validate(&self) -> Result<()> {
        if self.mempool.max_transactions == 0 {
            return Err(UtilityError::InvalidConfig(
                "mempool.max_transactions must be positive".to_string(),
            ));
        }
        if self.mempool.max_total_bytes == 0 {
            return Err(UtilityError::InvalidConfig(
                "mempool.max_total_bytes must be positive".to_string(),
            ));
        }
        if self.max_block_transaction_bytes == 0 {
            return Err(UtilityError::InvalidConfig(
                "max_block_transaction_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
