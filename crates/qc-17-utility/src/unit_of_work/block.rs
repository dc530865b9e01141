//! Block boundaries: missed-block slashing and fee distribution.

use shared_types::{ActorType, Address, Pool, StakeStatus};
use tracing::{debug, info, warn};

use super::UnitOfWork;
use crate::domain::{
    split_fees, MISSED_BLOCKS_BURN_PERCENTAGE, PROPOSER_PERCENTAGE_OF_FEES,
    VALIDATOR_MAXIMUM_MISSED_BLOCKS,
};
use crate::error::{PersistenceResultExt, Result};

impl UnitOfWork {
    /// Count a missed block for each listed validator. A validator past the
    /// limit is paused, its counter reset and its stake burned.
    pub fn begin_block(&mut self, byzantine_validators: &[Address]) -> Result<()> {
        self.ensure_open()?;
        debug!(
            height = self.height,
            byzantine = byzantine_validators.len(),
            "[qc-17] Begin block"
        );
        let max_missed = self.get_blocks_param(VALIDATOR_MAXIMUM_MISSED_BLOCKS)?;
        let burn_percentage = self.get_int_param(MISSED_BLOCKS_BURN_PERCENTAGE)?;

        for address in byzantine_validators {
            let Some(mut validator) = self
                .rw_context
                .get_actor(ActorType::Validator, address)
                .during("get_actor")?
            else {
                warn!(
                    height = self.height,
                    address = %hex::encode(address),
                    "[qc-17] Byzantine validator not found, skipping"
                );
                continue;
            };

            validator.missed_blocks = validator.missed_blocks.saturating_add(1);
            if u64::from(validator.missed_blocks) <= max_missed {
                self.update_actor_record(validator)?;
                continue;
            }

            if !validator.is_paused() && validator.status == StakeStatus::Staked {
                validator.paused_height = Some(self.height);
            }
            validator.missed_blocks = 0;
            self.update_actor_record(validator)?;
            self.burn_validator(address, burn_percentage)?;
        }
        Ok(())
    }

    /// Split the fee pool between the proposer and the DAO, then run the
    /// unbonding and max-pause sweeps for every actor kind.
    pub fn end_block(&mut self, proposer: &Address) -> Result<()> {
        self.ensure_open()?;
        let fees = self.get_pool_amount(Pool::FeeCollector)?;
        let (proposer_cut, dao_cut) =
            split_fees(&fees, self.get_int_param(PROPOSER_PERCENTAGE_OF_FEES)?)?;
        self.subtract_pool_amount(Pool::FeeCollector, &fees)?;
        self.add_account_amount(proposer, &proposer_cut)?;
        self.add_pool_amount(Pool::Dao, &dao_cut)?;

        for actor_type in ActorType::ALL {
            self.unbond_ready_actors(actor_type)?;
        }
        for actor_type in ActorType::ALL {
            self.unstake_max_paused_actors(actor_type)?;
        }

        info!(
            height = self.height,
            proposer = %hex::encode(proposer),
            fees = %fees,
            "[qc-17] End block"
        );
        Ok(())
    }
}
