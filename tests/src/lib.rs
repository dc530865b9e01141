//! # Quantum-Chain Test Suite
//!
//! Cross-crate flows over the state-transition engine. Every test drives
//! `qc-17-utility` through its public API on top of the in-memory
//! persistence adapter (`qc-04`) and the FIFO mempool (`qc-06`).
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs          # TestNode harness, keys, signed transactions
//! └── integration/
//!     ├── pipeline.rs      # Leader/replica agreement, commit, resubmission
//!     ├── economics.rs     # Supply conservation, fees, burns
//!     ├── lifecycle.rs     # Stake/unstake/unbond across heights
//!     ├── governance.rs    # ACL-owned parameter changes
//!     ├── mempool.rs       # Capacity scenarios, concurrent admission
//!     └── session.rs       # Deterministic servicer and fisherman dispatch
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! cargo test -p qc-tests integration::pipeline::
//! ```

#![allow(dead_code)]

pub mod integration;
