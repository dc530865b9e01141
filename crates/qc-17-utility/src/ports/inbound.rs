//! Inbound ports (driving side - API)

use shared_types::{Address, Hash, ParamValue};

use crate::domain::Session;
use crate::error::Result;
use crate::unit_of_work::{LeaderUnitOfWork, ProposalBlock, ReplicaUnitOfWork};

/// Primary port: transaction admission and unit-of-work creation
pub trait UtilityApi: Send + Sync {
    /// Validate transaction bytes and admit them to the mempool.
    ///
    /// # Errors
    /// - `DuplicateTransaction`: already pooled
    /// - `TransactionAlreadyCommitted`: already in a committed block
    /// - `Validation` / `Codec` / `UnknownMessage`: structurally invalid
    fn handle_transaction(&self, tx_bytes: &[u8]) -> Result<Hash>;

    /// Open the unit of work for `height`, flavored by the local role.
    fn new_unit_of_work(&self, height: u64, is_leader: bool) -> Result<UnitOfWorkRole>;

    /// Parameter value as of `height`.
    fn get_parameter(&self, name: &str, height: u64) -> Result<ParamValue>;

    /// Session serving `application` on `relay_chain` during the session
    /// that contains `height`.
    ///
    /// # Errors
    /// - `FutureHeight`: `height` is not committed yet
    /// - `ActorNotFound`: no application at the session start
    /// - `InvalidStatus` / `ActorPaused`: application cannot dispatch
    /// - `ChainNotStaked`: application does not serve `relay_chain`
    fn get_session(&self, application: &Address, height: u64, relay_chain: &str)
        -> Result<Session>;
}

/// Operations common to both roles, as seen by block orchestration.
pub trait UtilityUnitOfWork: Send {
    fn height(&self) -> u64;

    fn proposal(&self) -> Option<&ProposalBlock>;

    /// Apply the pending proposal and return the state hash.
    fn apply_block(&mut self) -> Result<Hash>;

    /// Persist the block with its quorum certificate.
    fn commit(&mut self, quorum_certificate: Vec<u8>) -> Result<()>;

    /// Discard all work. Idempotent.
    fn release(&mut self) -> Result<()>;
}

/// Role-specific unit of work returned by [`UtilityApi::new_unit_of_work`].
pub enum UnitOfWorkRole {
    Leader(LeaderUnitOfWork),
    Replica(ReplicaUnitOfWork),
}

impl UnitOfWorkRole {
    pub fn as_leader_mut(&mut self) -> Option<&mut LeaderUnitOfWork> {
        match self {
            UnitOfWorkRole::Leader(uow) => Some(uow),
            UnitOfWorkRole::Replica(_) => None,
        }
    }

    pub fn as_replica_mut(&mut self) -> Option<&mut ReplicaUnitOfWork> {
        match self {
            UnitOfWorkRole::Replica(uow) => Some(uow),
            UnitOfWorkRole::Leader(_) => None,
        }
    }

    pub fn is_leader(&self) -> bool {
        matches!(self, UnitOfWorkRole::Leader(_))
    }
}

impl UtilityUnitOfWork for LeaderUnitOfWork {
    fn height(&self) -> u64 {
        (**self).height()
    }

    fn proposal(&self) -> Option<&ProposalBlock> {
        (**self).proposal()
    }

    fn apply_block(&mut self) -> Result<Hash> {
        LeaderUnitOfWork::apply_block(self)
    }

    fn commit(&mut self, quorum_certificate: Vec<u8>) -> Result<()> {
        (**self).commit(quorum_certificate)
    }

    fn release(&mut self) -> Result<()> {
        (**self).release()
    }
}

impl UtilityUnitOfWork for ReplicaUnitOfWork {
    fn height(&self) -> u64 {
        (**self).height()
    }

    fn proposal(&self) -> Option<&ProposalBlock> {
        (**self).proposal()
    }

    fn apply_block(&mut self) -> Result<Hash> {
        ReplicaUnitOfWork::apply_block(self)
    }

    fn commit(&mut self, quorum_certificate: Vec<u8>) -> Result<()> {
        (**self).commit(quorum_certificate)
    }

    fn release(&mut self) -> Result<()> {
        (**self).release()
    }
}

impl UtilityUnitOfWork for UnitOfWorkRole {
    fn height(&self) -> u64 {
        match self {
            UnitOfWorkRole::Leader(uow) => UtilityUnitOfWork::height(uow),
            UnitOfWorkRole::Replica(uow) => UtilityUnitOfWork::height(uow),
        }
    }

    fn proposal(&self) -> Option<&ProposalBlock> {
        match self {
            UnitOfWorkRole::Leader(uow) => UtilityUnitOfWork::proposal(uow),
            UnitOfWorkRole::Replica(uow) => UtilityUnitOfWork::proposal(uow),
        }
    }

    fn apply_block(&mut self) -> Result<Hash> {
        match self {
            UnitOfWorkRole::Leader(uow) => uow.apply_block(),
            UnitOfWorkRole::Replica(uow) => uow.apply_block(),
        }
    }

    fn commit(&mut self, quorum_certificate: Vec<u8>) -> Result<()> {
        match self {
            UnitOfWorkRole::Leader(uow) => UtilityUnitOfWork::commit(uow, quorum_certificate),
            UnitOfWorkRole::Replica(uow) => UtilityUnitOfWork::commit(uow, quorum_certificate),
        }
    }

    fn release(&mut self) -> Result<()> {
        match self {
            UnitOfWorkRole::Leader(uow) => UtilityUnitOfWork::release(uow),
            UnitOfWorkRole::Replica(uow) => UtilityUnitOfWork::release(uow),
        }
    }
}
