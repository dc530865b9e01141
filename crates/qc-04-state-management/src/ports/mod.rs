pub mod api;
pub mod context;

pub use api::*;
pub use context::*;
