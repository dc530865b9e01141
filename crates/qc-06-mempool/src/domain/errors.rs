//! Mempool error types.

use super::Hash;

/// Mempool error type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MempoolError {
    /// Transaction already exists in the pool.
    DuplicateTransaction(Hash),

    /// Pop on an empty pool.
    EmptyPool,
}

impl std::fmt::Display for MempoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTransaction(hash) => {
                write!(f, "Duplicate transaction: {}", hex::encode(&hash[..4]))
            }
            Self::EmptyPool => write!(f, "Mempool is empty"),
        }
    }
}

impl std::error::Error for MempoolError {}
