//! Ports layer for the utility subsystem

pub mod inbound;

pub use inbound::*;
