//! # Quantum Chain - Utility (Subsystem 17)
//!
//! **Bounded Context:** State transitions of a proof-of-stake ledger
//!
//! ## Purpose
//!
//! Given a height, a proposer and an ordered batch of transactions, the
//! utility deterministically mutates balances, actor stake records and
//! governance parameters, then yields the state hash of the result. Every
//! honest node applying the same batch reaches the same hash.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Service                                            │
//! │  - UtilityModule: admission, unit-of-work factory   │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports                                              │
//! │  - Inbound: UtilityApi, UtilityUnitOfWork           │
//! │  - Consumed: PersistenceModule (qc-04),             │
//! │              TxMempool (qc-06)                      │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Unit of Work                                       │
//! │  - Leader / Replica pipelines                       │
//! │  - Ante-handling, dispatch, actor lifecycle         │
//! │  - Ledger, governance, begin/end block              │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (pure)                                      │
//! │  - Messages, parameter registry, economics, genesis │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Balances never go negative | `unit_of_work/ledger.rs` - `subtract_*` |
//! | Stake only grows through edit-stake | `unit_of_work/actor.rs` - `edit_stake()` |
//! | Paused implies staked, unstaking height implies unstaking | `Actor::begin_unstaking()` |
//! | Only the owner changes a parameter | `unit_of_work/handlers.rs` - `change_parameter()` |
//! | Every accepted transaction pays exactly its fee | `unit_of_work/transaction.rs` - `ante_handle()` |
//! | Leader drops failing transactions, replica rejects the block | `leader.rs` / `replica.rs` |
//! | Committed or released exactly once | `unit_of_work/mod.rs` - lifecycle |
//!
//! ## Block Pipeline
//!
//! ```text
//! begin_block(byzantine) → [save point → ante_handle → dispatch]* → end_block(proposer)
//!        │                                                                │
//!   missed-block burns                                 fee split, unbond and max-pause sweeps
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod unit_of_work;

pub use config::UtilityConfig;
pub use domain::*;
pub use error::{Result, UtilityError};
pub use metrics::Metrics;
pub use ports::{UnitOfWorkRole, UtilityApi, UtilityUnitOfWork};
pub use service::UtilityModule;
pub use unit_of_work::{LeaderUnitOfWork, ProposalBlock, ReplicaUnitOfWork, UnitOfWork};

/// Default upper bound on transaction bytes in one proposal (4 MiB).
pub const DEFAULT_MAX_BLOCK_TRANSACTION_BYTES: u64 = 4 * 1024 * 1024;
