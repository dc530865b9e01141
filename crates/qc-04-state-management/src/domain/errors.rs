use shared_types::{ActorType, Address, CodecError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("Context already committed or released")]
    ContextClosed,

    #[error("A read-write context is already open at height {open_height}")]
    WriterBusy { open_height: u64 },

    #[error("Height {height} is not above the latest committed height {latest}")]
    HeightAlreadyCommitted { height: u64, latest: u64 },

    #[error("No state committed at or below height {height}")]
    HeightNotFound { height: u64 },

    #[error("{actor_type} actor {} already exists", hex::encode(address))]
    ActorExists {
        actor_type: ActorType,
        address: Address,
    },

    #[error("{actor_type} actor {} not found", hex::encode(address))]
    ActorNotFound {
        actor_type: ActorType,
        address: Address,
    },

    #[error("Save point already exists: {0}")]
    SavePointExists(String),

    #[error("Save point not found: {0}")]
    SavePointNotFound(String),

    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("Serialization error: {0}")]
    Serialization(#[from] CodecError),
}
