//! Actor lifecycle, generic over the four actor kinds.
//!
//! | Operation | Requires | Effect |
//! |-----------|----------|--------|
//! | `stake` | absent, amount ≥ minimum, chains ≤ max | signer → pool, record inserted |
//! | `edit_stake` | present, amount ≥ current | delta signer → pool |
//! | `unstake` | `Staked` | `Unstaking` until `height + unstaking_blocks` |
//! | `pause` | not paused, `Staked` | `paused_height = height` |
//! | `unpause` | paused ≥ minimum pause blocks | pause cleared |
//! | `unbond_ready_actors` | `Unstaking`, height reached | pool → output, record deleted |
//! | `unstake_max_paused_actors` | paused too long | forced `Unstaking` |
//! | `burn_validator` | validator present | stake cut, pool debited |

use shared_types::{Actor, ActorType, Address, Amount, Pool, StakeStatus};
use tracing::{debug, info};

use super::UnitOfWork;
use crate::domain::{
    calculate_app_relays, max_chains, max_pause_blocks, minimum_pause_blocks, minimum_stake,
    stake_after_burn, unstaking_blocks, MessageEditStake, MessagePause, MessageStake,
    MessageUnpause, MessageUnstake, APP_BASELINE_STAKE_RATE, APP_STAKING_ADJUSTMENT,
};
use crate::error::{PersistenceResultExt, Result, UtilityError};

impl UnitOfWork {
    /// Actor record from the working state.
    pub fn get_actor(&self, actor_type: ActorType, address: &Address) -> Result<Actor> {
        self.rw_context
            .get_actor(actor_type, address)
            .during("get_actor")?
            .ok_or(UtilityError::ActorNotFound {
                actor_type,
                address: *address,
            })
    }

    pub fn get_actors(&self, actor_type: ActorType) -> Result<Vec<Actor>> {
        self.rw_context.get_actors(actor_type).during("get_actors")
    }

    pub(crate) fn update_actor_record(&mut self, actor: Actor) -> Result<()> {
        self.ensure_open()?;
        self.rw_context.update_actor(actor).during("update_actor")
    }

    fn check_minimum_stake(&self, actor_type: ActorType, amount: &Amount) -> Result<()> {
        let minimum = self.get_big_int_param(minimum_stake(actor_type))?;
        if amount < &minimum {
            return Err(UtilityError::BelowMinimumStake {
                actor_type,
                amount: amount.clone(),
                minimum,
            });
        }
        Ok(())
    }

    fn check_max_chains(&self, actor_type: ActorType, chains: usize) -> Result<()> {
        let Some(param) = max_chains(actor_type) else {
            return Ok(());
        };
        let max = self.get_int_param(param)?;
        if i64::try_from(chains).unwrap_or(i64::MAX) > i64::from(max) {
            return Err(UtilityError::MaxChains {
                actor_type,
                chains,
                max,
            });
        }
        Ok(())
    }

    fn app_relays(&self, amount: &Amount) -> Result<i64> {
        Ok(calculate_app_relays(
            amount,
            self.get_int_param(APP_BASELINE_STAKE_RATE)?,
            self.get_int_param(APP_STAKING_ADJUSTMENT)?,
        ))
    }

    fn begin_unstaking(&self, actor: &mut Actor) -> Result<()> {
        let unstaking = self.get_blocks_param(unstaking_blocks(actor.actor_type))?;
        actor.begin_unstaking(self.height.saturating_add(unstaking));
        Ok(())
    }

    // =========================================================================
    // MESSAGE-DRIVEN TRANSITIONS
    // =========================================================================

    pub fn stake(&mut self, msg: &MessageStake) -> Result<()> {
        let signer = msg.signer.ok_or(UtilityError::SignerNotSet)?;
        let actor_type = msg.actor_type;
        let address = msg.actor_address();

        if self
            .rw_context
            .get_actor(actor_type, &address)
            .during("get_actor")?
            .is_some()
        {
            return Err(UtilityError::ActorAlreadyExists {
                actor_type,
                address,
            });
        }
        self.check_minimum_stake(actor_type, &msg.amount)?;
        if actor_type.has_chains() {
            self.check_max_chains(actor_type, msg.chains.len())?;
        }

        self.subtract_account_amount(&signer, &msg.amount)?;
        self.add_pool_amount(actor_type.stake_pool(), &msg.amount)?;

        let mut actor = Actor::staked(
            actor_type,
            address,
            msg.public_key.clone(),
            msg.output_address,
            msg.amount.clone(),
        );
        if actor_type.has_chains() {
            actor.chains = msg.chains.clone();
        }
        if actor_type.has_service_url() {
            actor.service_url = msg.service_url.clone();
        }
        if actor_type == ActorType::Application {
            actor.max_relays = Some(self.app_relays(&msg.amount)?);
        }
        self.ensure_open()?;
        self.rw_context.insert_actor(actor).during("insert_actor")?;

        info!(
            height = self.height,
            %actor_type,
            address = %hex::encode(address),
            amount = %msg.amount,
            "[qc-17] Actor staked"
        );
        Ok(())
    }

    /// Raise the stake and replace chains and service URL. Pause and
    /// unstaking state are left untouched.
    pub fn edit_stake(&mut self, msg: &MessageEditStake) -> Result<()> {
        let signer = msg.signer.ok_or(UtilityError::SignerNotSet)?;
        let actor_type = msg.actor_type;
        let mut actor = self.get_actor(actor_type, &msg.address)?;

        if msg.amount < actor.staked_amount {
            return Err(UtilityError::StakeDecrease {
                current: actor.staked_amount,
                requested: msg.amount.clone(),
            });
        }
        if actor_type.has_chains() {
            self.check_max_chains(actor_type, msg.chains.len())?;
        }

        let delta = &msg.amount - &actor.staked_amount;
        self.subtract_account_amount(&signer, &delta)?;
        self.add_pool_amount(actor_type.stake_pool(), &delta)?;

        actor.staked_amount = msg.amount.clone();
        if actor_type.has_chains() {
            actor.chains = msg.chains.clone();
        }
        if actor_type.has_service_url() && msg.service_url.is_some() {
            actor.service_url = msg.service_url.clone();
        }
        if actor_type == ActorType::Application {
            actor.max_relays = Some(self.app_relays(&actor.staked_amount)?);
        }
        self.update_actor_record(actor)
    }

    pub fn unstake(&mut self, msg: &MessageUnstake) -> Result<()> {
        let mut actor = self.get_actor(msg.actor_type, &msg.address)?;
        if actor.status != StakeStatus::Staked {
            return Err(UtilityError::InvalidStatus {
                actor_type: msg.actor_type,
                address: msg.address,
                expected: StakeStatus::Staked,
                actual: actor.status,
            });
        }
        self.begin_unstaking(&mut actor)?;
        info!(
            height = self.height,
            actor_type = %msg.actor_type,
            address = %hex::encode(msg.address),
            unstaking_height = ?actor.unstaking_height,
            "[qc-17] Actor unstaking"
        );
        self.update_actor_record(actor)
    }

    pub fn pause(&mut self, msg: &MessagePause) -> Result<()> {
        let mut actor = self.get_actor(msg.actor_type, &msg.address)?;
        if actor.is_paused() {
            return Err(UtilityError::AlreadyPaused {
                actor_type: msg.actor_type,
                address: msg.address,
            });
        }
        if actor.status != StakeStatus::Staked {
            return Err(UtilityError::InvalidStatus {
                actor_type: msg.actor_type,
                address: msg.address,
                expected: StakeStatus::Staked,
                actual: actor.status,
            });
        }
        actor.paused_height = Some(self.height);
        self.update_actor_record(actor)
    }

    pub fn unpause(&mut self, msg: &MessageUnpause) -> Result<()> {
        let mut actor = self.get_actor(msg.actor_type, &msg.address)?;
        let Some(paused_height) = actor.paused_height else {
            return Err(UtilityError::NotPaused {
                actor_type: msg.actor_type,
                address: msg.address,
            });
        };
        let minimum = self.get_blocks_param(minimum_pause_blocks(msg.actor_type))?;
        let eligible_height = paused_height.saturating_add(minimum);
        if self.height < eligible_height {
            return Err(UtilityError::NotReadyToUnpause {
                address: msg.address,
                eligible_height,
            });
        }
        actor.paused_height = None;
        self.update_actor_record(actor)
    }

    // =========================================================================
    // END-BLOCK SWEEPS
    // =========================================================================

    /// Return stake to the output address of every actor whose unbonding
    /// height has been reached, and delete the record.
    pub fn unbond_ready_actors(&mut self, actor_type: ActorType) -> Result<()> {
        let height = self.height;
        let ready: Vec<Actor> = self
            .get_actors(actor_type)?
            .into_iter()
            .filter(|a| {
                a.status == StakeStatus::Unstaking
                    && a.unstaking_height.is_some_and(|h| h <= height)
            })
            .collect();

        for actor in ready {
            self.subtract_pool_amount(actor_type.stake_pool(), &actor.staked_amount)?;
            self.add_account_amount(&actor.output_address, &actor.staked_amount)?;
            self.ensure_open()?;
            self.rw_context
                .delete_actor(actor_type, &actor.address)
                .during("delete_actor")?;
            info!(
                height,
                %actor_type,
                address = %hex::encode(actor.address),
                amount = %actor.staked_amount,
                "[qc-17] Actor unbonded"
            );
        }
        Ok(())
    }

    /// Force into unstaking every actor paused strictly before
    /// `height - max_pause_blocks`.
    pub fn unstake_max_paused_actors(&mut self, actor_type: ActorType) -> Result<()> {
        let max_pause = self.get_blocks_param(max_pause_blocks(actor_type))?;
        let threshold = self.height.saturating_sub(max_pause);
        let expired: Vec<Actor> = self
            .get_actors(actor_type)?
            .into_iter()
            .filter(|a| a.paused_height.is_some_and(|h| h < threshold))
            .collect();

        for mut actor in expired {
            self.begin_unstaking(&mut actor)?;
            debug!(
                height = self.height,
                %actor_type,
                address = %hex::encode(actor.address),
                "[qc-17] Paused too long, unstaking"
            );
            self.update_actor_record(actor)?;
        }
        Ok(())
    }

    // =========================================================================
    // SLASHING
    // =========================================================================

    /// Keep `percentage` percent of a validator's stake and remove the rest
    /// from the validator pool. A staked validator left below the minimum
    /// begins unstaking.
    pub fn burn_validator(&mut self, address: &Address, percentage: i32) -> Result<()> {
        let mut actor = self.get_actor(ActorType::Validator, address)?;
        let remaining = stake_after_burn(&actor.staked_amount, percentage);
        let burned = &actor.staked_amount - &remaining;
        self.subtract_pool_amount(Pool::ValidatorStake, &burned)?;
        actor.staked_amount = remaining;

        let minimum = self.get_big_int_param(minimum_stake(ActorType::Validator))?;
        if actor.staked_amount < minimum && actor.status == StakeStatus::Staked {
            self.begin_unstaking(&mut actor)?;
        }
        info!(
            height = self.height,
            address = %hex::encode(address),
            %burned,
            remaining = %actor.staked_amount,
            "[qc-17] Validator burned"
        );
        self.update_actor_record(actor)
    }
}
