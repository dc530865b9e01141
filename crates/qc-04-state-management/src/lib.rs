//! # qc-04-state-management
//!
//! Persistence for the state-transition engine.
//!
//! ## Role in System
//!
//! - **Narrow contract**: the utility engine sees persistence only through
//!   `PersistenceModule`, `PersistenceReadContext` and `PersistenceRWContext`.
//! - **Height-versioned**: every commit stores a snapshot keyed by height, so
//!   read contexts answer historical queries, including parameter values as
//!   they stood at that height.
//! - **Single writer**: at most one read-write context is open at a time;
//!   read contexts are independent and may coexist with it.
//!
//! ## Context Lifecycle
//!
//! ```text
//! new_rw_context(h) ──→ [Open] ──commit(proposer, qc)──→ snapshot stored at h
//!                          │
//!                          ├── new_save_point(name) / rollback_to_save_point(name)
//!                          │
//!                          └── release() ──→ discarded, writer slot freed
//! ```
//!
//! ## State Commitment
//!
//! `compute_state_hash()` is SHA3-256 over the canonical encoding of the
//! ordered world state (accounts, pools, actors, parameters). Equal states
//! hash equally on every node.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
