//! Replica role: re-execute a received proposal.

use std::ops::{Deref, DerefMut};

use shared_types::Hash;
use tracing::{info, warn};

use super::{ProposalBlock, UnitOfWork};
use crate::error::{Result, UtilityError};

/// Unit of work for a node validating someone else's proposal.
///
/// Any failing transaction rejects the whole proposal and releases the
/// unit, discarding every write.
pub struct ReplicaUnitOfWork {
    inner: UnitOfWork,
    applied: Option<Hash>,
}

impl ReplicaUnitOfWork {
    pub(crate) fn new(inner: UnitOfWork) -> Self {
        Self {
            inner,
            applied: None,
        }
    }

    /// Set the proposal to validate. Replaces any earlier one until the
    /// block has been applied.
    pub fn set_proposal_block(&mut self, proposal: ProposalBlock) -> Result<()> {
        self.inner.ensure_open()?;
        if self.applied.is_some() {
            return Err(UtilityError::ProposalAlreadyCreated {
                height: self.inner.height,
            });
        }
        self.inner.proposal = Some(proposal);
        Ok(())
    }

    /// Apply the proposal and return the resulting state hash. Repeated
    /// calls after success return the same hash.
    ///
    /// # Errors
    /// - `ProposalNotSet`: no proposal was given
    /// - `StateHashMismatch`: computed hash differs from the proposal's
    /// - any transaction error, unchanged
    pub fn apply_block(&mut self) -> Result<Hash> {
        if let Some(state_hash) = self.applied {
            self.inner.ensure_open()?;
            return Ok(state_hash);
        }
        let result = self.try_apply_block();
        match &result {
            Ok(state_hash) => self.applied = Some(*state_hash),
            Err(err) => {
                if err.is_invalid_proposal() {
                    self.inner.metrics.record_proposal_rejected();
                }
                warn!(height = self.inner.height, error = %err, "[qc-17] Rejected proposal");
                self.inner.release()?;
            }
        }
        result
    }

    fn try_apply_block(&mut self) -> Result<Hash> {
        let uow = &mut self.inner;
        uow.ensure_open()?;
        let proposal = uow.proposal.clone().ok_or(UtilityError::ProposalNotSet)?;

        uow.begin_block(&proposal.byzantine_validators)?;
        for (index, tx) in proposal.transactions.iter().enumerate() {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            uow.apply_with_save_point(index, tx)?;
        }
        uow.end_block(&proposal.proposer)?;

        let state_hash = uow.compute_state_hash()?;
        if let Some(expected) = proposal.state_hash {
            if expected != state_hash {
                return Err(UtilityError::StateHashMismatch {
                    expected,
                    actual: state_hash,
                });
            }
        }

        let removed = proposal
            .transactions
            .iter()
            .filter(|tx| uow.mempool.remove_tx(tx))
            .count();
        info!(
            height = uow.height,
            txs = proposal.transactions.len(),
            removed_from_mempool = removed,
            state_hash = %hex::encode(state_hash),
            "[qc-17] Applied proposal block"
        );
        Ok(state_hash)
    }
}

impl Deref for ReplicaUnitOfWork {
    type Target = UnitOfWork;

    fn deref(&self) -> &UnitOfWork {
        &self.inner
    }
}

impl DerefMut for ReplicaUnitOfWork {
    fn deref_mut(&mut self) -> &mut UnitOfWork {
        &mut self.inner
    }
}
