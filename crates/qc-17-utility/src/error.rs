//! Error types for the utility subsystem

use qc_04_state_management::PersistenceError;
use qc_06_mempool::MempoolError;
use shared_types::{ActorType, Address, Amount, CodecError, Hash, Pool, StakeStatus, ValidationError};
use thiserror::Error;

use crate::domain::ParamKind;

/// Result type alias for utility operations
pub type Result<T> = std::result::Result<T, UtilityError>;

/// Errors raised while admitting transactions or applying blocks.
///
/// Everything except `Persistence` is a deterministic verdict about the
/// transaction or block: every honest node reaches it for the same input.
#[derive(Debug, Error)]
pub enum UtilityError {
    // === Ledger ===
    /// Account balance too low for a debit
    #[error("Insufficient amount in account {}", hex::encode(address))]
    InsufficientAmount { address: Address },

    /// Pool balance too low for a debit
    #[error("Insufficient amount in pool {pool}")]
    InsufficientPoolAmount { pool: Pool },

    // === Actors ===
    /// Actor already staked
    #[error("{actor_type} actor {} already exists", hex::encode(address))]
    ActorAlreadyExists {
        actor_type: ActorType,
        address: Address,
    },

    /// Actor not staked
    #[error("{actor_type} actor {} does not exist", hex::encode(address))]
    ActorNotFound {
        actor_type: ActorType,
        address: Address,
    },

    /// Operation not allowed in the actor's current status
    #[error("{actor_type} actor {} has status {actual}, expected {expected}", hex::encode(address))]
    InvalidStatus {
        actor_type: ActorType,
        address: Address,
        expected: StakeStatus,
        actual: StakeStatus,
    },

    /// Stake below the kind's minimum
    #[error("Stake {amount} is below the {actor_type} minimum of {minimum}")]
    BelowMinimumStake {
        actor_type: ActorType,
        amount: Amount,
        minimum: Amount,
    },

    /// Edit-stake tried to lower the stake
    #[error("Stake cannot decrease from {current} to {requested}")]
    StakeDecrease { current: Amount, requested: Amount },

    /// Too many relay chains
    #[error("{chains} chains exceed the {actor_type} maximum of {max}")]
    MaxChains {
        actor_type: ActorType,
        chains: usize,
        max: i32,
    },

    /// Pause on an already paused actor
    #[error("{actor_type} actor {} is already paused", hex::encode(address))]
    AlreadyPaused {
        actor_type: ActorType,
        address: Address,
    },

    /// Unpause on an actor that is not paused
    #[error("{actor_type} actor {} is not paused", hex::encode(address))]
    NotPaused {
        actor_type: ActorType,
        address: Address,
    },

    /// Minimum pause period not yet served
    #[error("Actor {} cannot unpause before height {eligible_height}", hex::encode(address))]
    NotReadyToUnpause {
        address: Address,
        eligible_height: u64,
    },

    /// Actor is paused and cannot take part
    #[error("{actor_type} actor {} is paused", hex::encode(address))]
    ActorPaused {
        actor_type: ActorType,
        address: Address,
    },

    // === Sessions ===
    /// Application not staked for the requested relay chain
    #[error("Application {} is not staked for chain {chain}", hex::encode(address))]
    ChainNotStaked { address: Address, chain: String },

    /// Query above the latest committed height
    #[error("Height {height} is above the latest committed height {latest}")]
    FutureHeight { height: u64, latest: u64 },

    // === Governance ===
    /// Parameter name not in the registry
    #[error("Unknown parameter: {0}")]
    UnknownParam(String),

    /// Registered parameter missing from state
    #[error("Parameter not set: {0}")]
    ParamNotSet(String),

    /// Value tag does not match the parameter's declared type
    #[error("Parameter {name} expects {expected}, got {actual}")]
    ParamTypeMismatch {
        name: String,
        expected: ParamKind,
        actual: &'static str,
    },

    /// Value has the right tag but an unusable payload
    #[error("Invalid value for parameter {name}: {reason}")]
    InvalidParamValue { name: String, reason: String },

    /// Proposer share of fees outside 0..=100
    #[error("Invalid proposer cut percentage: {0}")]
    InvalidProposerCutPercentage(i32),

    // === Transactions ===
    /// Message type URL not recognized
    #[error("Unknown message type: {0}")]
    UnknownMessage(String),

    /// Signer is not allowed to authorize this message
    #[error("Signer {} is not a valid signer for this message", hex::encode(signer))]
    InvalidSigner { signer: Address },

    /// Handler reached without ante-handling
    #[error("Message signer not set")]
    SignerNotSet,

    /// Already pooled
    #[error("Duplicate transaction: {}", hex::encode(.0))]
    DuplicateTransaction(Hash),

    /// Already included in a committed block
    #[error("Transaction already committed: {}", hex::encode(.0))]
    TransactionAlreadyCommitted(Hash),

    /// Double-sign evidence outside the accepted age window
    #[error("Evidence at height {evidence_height} is outside the window at height {current_height} (max age {max_age})")]
    EvidenceOutOfWindow {
        evidence_height: u64,
        current_height: u64,
        max_age: u64,
    },

    /// Structural validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Decoding failure
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Mempool rejected the transaction
    #[error("Mempool error: {0}")]
    Mempool(#[from] MempoolError),

    // === Unit of work ===
    /// Save point name already on the stack
    #[error("Save point already exists: {0}")]
    SavePointExists(String),

    /// Revert with an empty save-point stack
    #[error("No save points to revert")]
    NoSavePoints,

    /// Block operation before a proposal was built or received
    #[error("Proposal block not set")]
    ProposalNotSet,

    /// Leader asked to build a second proposal
    #[error("Proposal block already created at height {height}")]
    ProposalAlreadyCreated { height: u64 },

    /// Replica computed a different state than the proposal claims
    #[error("State hash mismatch: expected {}, computed {}", hex::encode(expected), hex::encode(actual))]
    StateHashMismatch { expected: Hash, actual: Hash },

    /// Unit of work already committed or released
    #[error("Unit of work at height {height} is closed")]
    UnitOfWorkClosed { height: u64 },

    // === Local ===
    /// Storage failure, wrapped with the operation that hit it
    #[error("Persistence failure during {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: PersistenceError,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl UtilityError {
    /// Local storage failure. Always fatal to the current unit of work and
    /// never evidence against the proposal.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    /// Deterministic rejection: the transaction or proposal is invalid on
    /// every node.
    pub fn is_invalid_proposal(&self) -> bool {
        !matches!(
            self,
            Self::Persistence { .. } | Self::InvalidConfig(_) | Self::UnitOfWorkClosed { .. }
        )
    }
}

/// Attach the triggering operation to persistence errors.
pub(crate) trait PersistenceResultExt<T> {
    fn during(self, operation: &'static str) -> Result<T>;
}

impl<T> PersistenceResultExt<T> for std::result::Result<T, PersistenceError> {
    fn during(self, operation: &'static str) -> Result<T> {
        self.map_err(|source| UtilityError::Persistence { operation, source })
    }
}
