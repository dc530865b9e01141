//! Genesis State
//!
//! Builds the world state committed at height 0: funded accounts, all six
//! pools, pre-staked actors and the full default parameter table.

use qc_04_state_management::WorldState;
use shared_types::{Actor, Address, Amount, ParamValue, Pool};

use crate::domain::economics::calculate_app_relays;
use crate::domain::params::{
    all_param_names, param_kind, ParamKind, ACL_OWNER, APP_BASELINE_STAKE_RATE,
    APP_STAKING_ADJUSTMENT, BLOCKS_PER_SESSION, DOUBLE_SIGN_BURN_PERCENTAGE, FISHERMEN_PER_SESSION,
    MISSED_BLOCKS_BURN_PERCENTAGE, PROPOSER_PERCENTAGE_OF_FEES, SERVICERS_PER_SESSION,
    VALIDATOR_MAXIMUM_MISSED_BLOCKS, VALIDATOR_MAX_EVIDENCE_AGE_IN_BLOCKS,
};

pub const DEFAULT_MINIMUM_STAKE: u64 = 15_000_000_000;
pub const DEFAULT_MESSAGE_FEE: u64 = 10_000;

const DEFAULT_MAX_CHAINS: i32 = 15;
const DEFAULT_UNSTAKING_BLOCKS: i32 = 2016;
const DEFAULT_MINIMUM_PAUSE_BLOCKS: i32 = 4;
const DEFAULT_MAX_PAUSE_BLOCKS: i32 = 672;

fn default_int(name: &str) -> i32 {
    match name {
        APP_BASELINE_STAKE_RATE => 100,
        APP_STAKING_ADJUSTMENT => 0,
        VALIDATOR_MAXIMUM_MISSED_BLOCKS => 5,
        VALIDATOR_MAX_EVIDENCE_AGE_IN_BLOCKS => 8,
        PROPOSER_PERCENTAGE_OF_FEES => 10,
        MISSED_BLOCKS_BURN_PERCENTAGE => 1,
        DOUBLE_SIGN_BURN_PERCENTAGE => 5,
        BLOCKS_PER_SESSION => 4,
        SERVICERS_PER_SESSION => 24,
        FISHERMEN_PER_SESSION => 1,
        n if n.ends_with("_max_chains") => DEFAULT_MAX_CHAINS,
        n if n.ends_with("_unstaking_blocks") => DEFAULT_UNSTAKING_BLOCKS,
        n if n.ends_with("_minimum_pause_blocks") => DEFAULT_MINIMUM_PAUSE_BLOCKS,
        n if n.ends_with("_max_pause_blocks") => DEFAULT_MAX_PAUSE_BLOCKS,
        _ => 0,
    }
}

fn default_big_int(name: &str) -> Amount {
    if name.ends_with("_minimum_stake") {
        Amount::from(DEFAULT_MINIMUM_STAKE)
    } else {
        Amount::from(DEFAULT_MESSAGE_FEE)
    }
}

/// Every registered parameter at its default, all owned by `acl_owner`.
pub fn default_params(acl_owner: Address) -> Vec<(String, ParamValue)> {
    all_param_names()
        .filter_map(|name| {
            let value = match param_kind(&name)? {
                ParamKind::Int => ParamValue::Int(default_int(&name)),
                ParamKind::BigInt => ParamValue::from(&default_big_int(&name)),
                ParamKind::Address => ParamValue::from(acl_owner),
            };
            Some((name, value))
        })
        .collect()
}

/// Builder for the height-0 world state.
#[derive(Debug, Clone)]
pub struct GenesisState {
    state: WorldState,
}

impl GenesisState {
    pub fn new(acl_owner: Address) -> Self {
        let mut state = WorldState::default();
        for pool in Pool::ALL {
            state.pools.insert(pool, Amount::default());
        }
        state.params.extend(default_params(acl_owner));
        Self { state }
    }

    pub fn with_account(mut self, address: Address, amount: Amount) -> Self {
        self.state.accounts.insert(address, amount);
        self
    }

    pub fn with_pool(mut self, pool: Pool, amount: Amount) -> Self {
        self.state.pools.insert(pool, amount);
        self
    }

    /// Add a staked actor and credit its stake to the matching pool.
    /// Applications get their relay allowance from the default rates.
    pub fn with_actor(mut self, mut actor: Actor) -> Self {
        if actor.actor_type == shared_types::ActorType::Application {
            actor.max_relays = Some(calculate_app_relays(
                &actor.staked_amount,
                self.int_param(APP_BASELINE_STAKE_RATE),
                self.int_param(APP_STAKING_ADJUSTMENT),
            ));
        }
        let pool = self
            .state
            .pools
            .entry(actor.actor_type.stake_pool())
            .or_default();
        *pool += &actor.staked_amount;
        self.state
            .actors
            .insert((actor.actor_type, actor.address), actor);
        self
    }

    pub fn with_param(mut self, name: &str, value: ParamValue) -> Self {
        self.state.params.insert(name.to_string(), value);
        self
    }

    fn int_param(&self, name: &str) -> i32 {
        match self.state.params.get(name) {
            Some(ParamValue::Int(v)) => *v,
            _ => default_int(name),
        }
    }

    pub fn acl_owner(&self) -> Option<&ParamValue> {
        self.state.params.get(ACL_OWNER)
    }

    pub fn into_world_state(self) -> WorldState {
        self.state
    }
}
