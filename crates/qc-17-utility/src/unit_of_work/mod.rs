//! # Unit of Work
//!
//! One block's worth of state transitions, bound to a height, a read view of
//! the previous height and the single read-write view of this height.
//!
//! ```text
//!            ┌──────────── Leader: create_proposal_block ────────────┐
//!   Open ──→ │ begin_block → (save point → apply tx)* → end_block    │ ──→ Committed
//!            └──────────── Replica: apply_block ─────────────────────┘
//!     │
//!     └──────────────────────── release ─────────────────────────────────→ Released
//! ```
//!
//! Governance parameters are read from the previous height, so a parameter
//! changed in block `h` governs blocks from `h + 1` on. Balances and actor
//! records are read from the working state.

mod actor;
mod block;
mod gov;
mod handlers;
mod leader;
mod ledger;
mod replica;
mod transaction;

pub use leader::LeaderUnitOfWork;
pub use replica::ReplicaUnitOfWork;

use std::sync::Arc;

use qc_04_state_management::{PersistenceRWContext, PersistenceReadContext};
use qc_06_mempool::TxMempool;
use shared_types::{Address, Hash};
use tracing::{debug, info};

use crate::error::{PersistenceResultExt, Result, UtilityError};
use crate::metrics::Metrics;

/// Block contents agreed between leader and replicas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalBlock {
    pub proposer: Address,
    /// Raw transactions in application order.
    pub transactions: Vec<Vec<u8>>,
    /// Validators reported as having missed the previous block.
    pub byzantine_validators: Vec<Address>,
    /// Expected state hash after the block. Leaders always fill it in;
    /// replicas check it when present.
    pub state_hash: Option<Hash>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Open,
    Committed,
    Released,
}

/// Shared pipeline state for both roles.
pub struct UnitOfWork {
    height: u64,
    read_context: Box<dyn PersistenceReadContext>,
    rw_context: Box<dyn PersistenceRWContext>,
    mempool: Arc<dyn TxMempool>,
    save_points: Vec<String>,
    proposal: Option<ProposalBlock>,
    lifecycle: Lifecycle,
    metrics: Arc<Metrics>,
}

impl UnitOfWork {
    pub(crate) fn new(
        height: u64,
        read_context: Box<dyn PersistenceReadContext>,
        rw_context: Box<dyn PersistenceRWContext>,
        mempool: Arc<dyn TxMempool>,
        metrics: Arc<Metrics>,
    ) -> Self {
        debug!(height, "[qc-17] Opened unit of work");
        Self {
            height,
            read_context,
            rw_context,
            mempool,
            save_points: Vec::new(),
            proposal: None,
            lifecycle: Lifecycle::Open,
            metrics,
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn proposal(&self) -> Option<&ProposalBlock> {
        self.proposal.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(UtilityError::UnitOfWorkClosed {
                height: self.height,
            })
        }
    }

    /// Hash of the working state.
    pub fn compute_state_hash(&self) -> Result<Hash> {
        self.rw_context
            .compute_state_hash()
            .during("compute_state_hash")
    }

    // =========================================================================
    // SAVE POINTS
    // =========================================================================

    /// Push a named save point. Names are unique among live save points.
    pub fn new_save_point(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        if self.save_points.iter().any(|sp| sp == name) {
            return Err(UtilityError::SavePointExists(name.to_string()));
        }
        self.rw_context
            .new_save_point(name)
            .during("new_save_point")?;
        self.save_points.push(name.to_string());
        Ok(())
    }

    /// Roll back to, and pop, the most recent save point.
    pub fn revert_last_save_point(&mut self) -> Result<()> {
        self.ensure_open()?;
        let name = self.save_points.pop().ok_or(UtilityError::NoSavePoints)?;
        self.rw_context
            .rollback_to_save_point(&name)
            .during("rollback_to_save_point")
    }

    /// Pop the most recent save point, keeping everything written since.
    pub fn release_last_save_point(&mut self) -> Result<()> {
        self.ensure_open()?;
        let name = self.save_points.pop().ok_or(UtilityError::NoSavePoints)?;
        self.rw_context
            .release_save_point(&name)
            .during("release_save_point")
    }

    /// Live save points held by the working state.
    pub fn save_point_depth(&self) -> usize {
        self.rw_context.save_point_depth()
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Persist the block under the proposal's proposer and close the unit.
    pub fn commit(&mut self, quorum_certificate: Vec<u8>) -> Result<()> {
        self.ensure_open()?;
        let proposer = self
            .proposal
            .as_ref()
            .ok_or(UtilityError::ProposalNotSet)?
            .proposer;
        self.rw_context
            .commit(proposer, quorum_certificate)
            .during("commit")?;
        self.read_context.release();
        self.save_points.clear();
        self.lifecycle = Lifecycle::Committed;
        self.metrics.record_committed();
        info!(
            height = self.height,
            proposer = %hex::encode(proposer),
            "[qc-17] Committed unit of work"
        );
        Ok(())
    }

    /// Discard all work. Idempotent; a no-op after commit.
    pub fn release(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::Open {
            return Ok(());
        }
        self.rw_context.release();
        self.read_context.release();
        self.save_points.clear();
        self.lifecycle = Lifecycle::Released;
        self.metrics.record_released();
        debug!(height = self.height, "[qc-17] Released unit of work");
        Ok(())
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
