//! # Domain Layer - Mempool Subsystem
//!
//! - `entities`: MempoolConfig, MempoolStatus
//! - `fifo_set`: insertion-ordered set keyed by hash
//! - `pool`: TxFifoMempool, the thread-safe bounded pool
//! - `errors`: MempoolError enumeration

pub use shared_types::Hash;

pub mod entities;
pub mod errors;
pub mod fifo_set;
pub mod pool;

pub use entities::*;
pub use errors::*;
pub use fifo_set::*;
pub use pool::*;
