//! Leader role: reap the mempool into a proposal.

use std::ops::{Deref, DerefMut};

use qc_06_mempool::MempoolError;
use shared_types::{transaction_hash, Address, Hash};
use tracing::{info, warn};

use super::{ProposalBlock, UnitOfWork};
use crate::error::{Result, UtilityError};

/// Unit of work for the node proposing this height.
///
/// Transactions that fail are rolled back and dropped; the block goes on.
pub struct LeaderUnitOfWork {
    inner: UnitOfWork,
}

impl LeaderUnitOfWork {
    pub(crate) fn new(inner: UnitOfWork) -> Self {
        Self { inner }
    }

    /// Build the proposal for this height.
    ///
    /// Pops transactions until the next one would push the batch past
    /// `max_transaction_bytes`; that transaction goes back to the mempool
    /// tail. Only persistence failures abort the proposal.
    pub fn create_proposal_block(
        &mut self,
        proposer: Address,
        max_transaction_bytes: u64,
        byzantine_validators: Vec<Address>,
    ) -> Result<ProposalBlock> {
        let uow = &mut self.inner;
        uow.ensure_open()?;
        if uow.proposal.is_some() {
            return Err(UtilityError::ProposalAlreadyCreated { height: uow.height });
        }

        uow.begin_block(&byzantine_validators)?;

        let mut transactions: Vec<Vec<u8>> = Vec::new();
        let mut total_bytes: u64 = 0;
        loop {
            let tx = match uow.mempool.pop_tx() {
                Ok(tx) => tx,
                Err(MempoolError::EmptyPool) => break,
                Err(err) => return Err(err.into()),
            };
            let size = tx.len() as u64;
            if total_bytes.saturating_add(size) > max_transaction_bytes {
                if let Err(err) = uow.mempool.add_tx(tx) {
                    warn!(error = %err, "[qc-17] Could not return transaction to mempool");
                }
                break;
            }

            let index = u32::try_from(transactions.len()).unwrap_or(u32::MAX);
            match uow.apply_with_save_point(index, &tx) {
                Ok(_) => {
                    total_bytes += size;
                    transactions.push(tx);
                }
                Err(err) if err.is_persistence_failure() => return Err(err),
                Err(err) => {
                    uow.metrics.record_rejected();
                    warn!(
                        height = uow.height,
                        tx_hash = %hex::encode(transaction_hash(&tx)),
                        error = %err,
                        "[qc-17] Dropping transaction from proposal"
                    );
                }
            }
        }

        uow.end_block(&proposer)?;
        let state_hash = uow.compute_state_hash()?;
        let proposal = ProposalBlock {
            proposer,
            transactions,
            byzantine_validators,
            state_hash: Some(state_hash),
        };
        info!(
            height = uow.height,
            txs = proposal.transactions.len(),
            bytes = total_bytes,
            state_hash = %hex::encode(state_hash),
            "[qc-17] Created proposal block"
        );
        uow.proposal = Some(proposal.clone());
        Ok(proposal)
    }

    /// State hash of the proposal already applied by `create_proposal_block`.
    pub fn apply_block(&mut self) -> Result<Hash> {
        self.inner.ensure_open()?;
        self.inner
            .proposal
            .as_ref()
            .and_then(|p| p.state_hash)
            .ok_or(UtilityError::ProposalNotSet)
    }
}

impl Deref for LeaderUnitOfWork {
    type Target = UnitOfWork;

    fn deref(&self) -> &UnitOfWork {
        &self.inner
    }
}

impl DerefMut for LeaderUnitOfWork {
    fn deref_mut(&mut self) -> &mut UnitOfWork {
        &mut self.inner
    }
}
