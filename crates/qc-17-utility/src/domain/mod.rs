//! # Domain Layer - Utility Subsystem
//!
//! Pure definitions with no persistence access:
//!
//! - `params`: governance parameter registry, owner resolution, per-kind names
//! - `messages`: transaction messages, structural validation, fee selection
//! - `economics`: relay throughput, burn and fee-split arithmetic
//! - `genesis`: initial world state and default parameters
//! - `session`: session boundaries, ids and actor selection

pub mod economics;
pub mod genesis;
pub mod messages;
pub mod params;
pub mod session;

pub use economics::*;
pub use genesis::*;
pub use messages::*;
pub use params::*;
pub use session::*;
