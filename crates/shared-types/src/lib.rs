//! # Shared Types Crate
//!
//! Ledger entities, transactions and the codec used by every subsystem of the
//! state-transition engine.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: actor records, pools, parameter values and
//!   transactions are defined once, here.
//! - **Amounts are decimal strings on the wire**: staked amounts and balances
//!   are arbitrary-precision integers serialized as base-10 text so no
//!   fixed-width overflow can leak across implementations.
//! - **Canonical encoding**: `codec` uses one fixed bincode configuration that
//!   rejects trailing bytes, so equal values always hash equally.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod transaction;

pub use codec::{from_any, marshal, to_any, unmarshal, Any, TypeUrl};
pub use entities::*;
pub use errors::*;
pub use transaction::{transaction_hash, Signature, Transaction};
