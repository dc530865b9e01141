//! # Transaction Pool (Mempool) Subsystem
//!
//! **Subsystem ID:** 6
//!
//! ## Purpose
//!
//! Holds signed, structurally valid transactions that have not been committed
//! yet, in strict arrival order, until a leader reaps them into a proposal.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | No duplicate hashes | `domain/fifo_set.rs` - `push_back()` membership check |
//! | `count <= max_transactions` after every call | `domain/pool.rs` - `evict_overflow()` |
//! | `total_bytes <= max_total_bytes` after every call | `domain/pool.rs` - `evict_overflow()` |
//! | Counters equal the aggregate of members | `domain/pool.rs` - `on_added()` / `on_removed()` |
//!
//! ## Overflow Policy
//!
//! Insertion always appends at the tail; the pool then evicts from the head
//! until both limits hold again. A transaction larger than `max_total_bytes`
//! therefore evicts itself and the caller still sees `Ok`.
//!
//! ```text
//!   add_tx ──→ [tail] ... [head] ──→ pop_tx
//!                           │
//!                           └── evicted while over capacity
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - TxMempool trait (driving port)             │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implemented by ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/pool.rs      - TxFifoMempool (locked, counted)          │
//! │  domain/fifo_set.rs  - FifoSet (ordered set, unsynchronized)    │
//! │  domain/entities.rs  - MempoolConfig, MempoolStatus             │
//! │  domain/errors.rs    - MempoolError                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod ports;

pub use domain::{FifoSet, MempoolConfig, MempoolError, MempoolStatus, TxFifoMempool};
pub use ports::TxMempool;

/// Default maximum number of pooled transactions.
pub const DEFAULT_MAX_TRANSACTIONS: usize = 9_000;

/// Default maximum aggregate size of pooled transactions (1 GiB).
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 1024 * 1024 * 1024;
