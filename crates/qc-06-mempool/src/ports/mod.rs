//! Ports layer for Mempool subsystem.

pub mod inbound;

pub use inbound::*;
