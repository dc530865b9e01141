//! # Integration Flows
//!
//! Multi-block scenarios that span persistence, mempool and the utility
//! pipeline. Single-operation behavior is covered by each crate's unit
//! tests; these check what only shows up across heights or nodes.

mod economics;
mod governance;
mod lifecycle;
mod mempool;
mod pipeline;
mod session;
