//! Governance parameter registry.
//!
//! Every parameter `p` has a dedicated owner parameter `p_owner` holding the
//! address allowed to change it. Owner parameters have no slot of their own
//! and are governed by the global `acl_owner`, which also governs itself.

use std::fmt;
use std::ops::RangeInclusive;

use shared_types::ActorType;

/// Declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Decimal string holding an arbitrary-precision integer
    BigInt,
    /// 32-bit signed integer
    Int,
    /// 20-byte address held as bytes
    Address,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamKind::BigInt => "big integer",
            ParamKind::Int => "int32",
            ParamKind::Address => "address",
        };
        f.write_str(s)
    }
}

pub const ACL_OWNER: &str = "acl_owner";
const OWNER_SUFFIX: &str = "_owner";

pub const APP_BASELINE_STAKE_RATE: &str = "app_baseline_stake_rate";
pub const APP_STAKING_ADJUSTMENT: &str = "app_staking_adjustment";
pub const VALIDATOR_MAXIMUM_MISSED_BLOCKS: &str = "validator_maximum_missed_blocks";
pub const VALIDATOR_MAX_EVIDENCE_AGE_IN_BLOCKS: &str = "validator_max_evidence_age_in_blocks";
pub const PROPOSER_PERCENTAGE_OF_FEES: &str = "proposer_percentage_of_fees";
pub const MISSED_BLOCKS_BURN_PERCENTAGE: &str = "missed_blocks_burn_percentage";
pub const DOUBLE_SIGN_BURN_PERCENTAGE: &str = "double_sign_burn_percentage";
pub const BLOCKS_PER_SESSION: &str = "blocks_per_session";
pub const SERVICERS_PER_SESSION: &str = "servicers_per_session";
pub const FISHERMEN_PER_SESSION: &str = "fishermen_per_session";

pub const MESSAGE_SEND_FEE: &str = "message_send_fee";
pub const MESSAGE_DOUBLE_SIGN_FEE: &str = "message_double_sign_fee";
pub const MESSAGE_CHANGE_PARAMETER_FEE: &str = "message_change_parameter_fee";

/// Every non-owner parameter with its declared type.
pub const BASE_PARAMS: &[(&str, ParamKind)] = &[
    ("app_minimum_stake", ParamKind::BigInt),
    ("app_max_chains", ParamKind::Int),
    ("app_unstaking_blocks", ParamKind::Int),
    ("app_minimum_pause_blocks", ParamKind::Int),
    ("app_max_pause_blocks", ParamKind::Int),
    (APP_BASELINE_STAKE_RATE, ParamKind::Int),
    (APP_STAKING_ADJUSTMENT, ParamKind::Int),
    ("servicer_minimum_stake", ParamKind::BigInt),
    ("servicer_max_chains", ParamKind::Int),
    ("servicer_unstaking_blocks", ParamKind::Int),
    ("servicer_minimum_pause_blocks", ParamKind::Int),
    ("servicer_max_pause_blocks", ParamKind::Int),
    (SERVICERS_PER_SESSION, ParamKind::Int),
    ("fisherman_minimum_stake", ParamKind::BigInt),
    ("fisherman_max_chains", ParamKind::Int),
    ("fisherman_unstaking_blocks", ParamKind::Int),
    ("fisherman_minimum_pause_blocks", ParamKind::Int),
    ("fisherman_max_pause_blocks", ParamKind::Int),
    (FISHERMEN_PER_SESSION, ParamKind::Int),
    ("validator_minimum_stake", ParamKind::BigInt),
    ("validator_unstaking_blocks", ParamKind::Int),
    ("validator_minimum_pause_blocks", ParamKind::Int),
    ("validator_max_pause_blocks", ParamKind::Int),
    (VALIDATOR_MAXIMUM_MISSED_BLOCKS, ParamKind::Int),
    (VALIDATOR_MAX_EVIDENCE_AGE_IN_BLOCKS, ParamKind::Int),
    (PROPOSER_PERCENTAGE_OF_FEES, ParamKind::Int),
    (MISSED_BLOCKS_BURN_PERCENTAGE, ParamKind::Int),
    (DOUBLE_SIGN_BURN_PERCENTAGE, ParamKind::Int),
    (BLOCKS_PER_SESSION, ParamKind::Int),
    (MESSAGE_SEND_FEE, ParamKind::BigInt),
    (MESSAGE_DOUBLE_SIGN_FEE, ParamKind::BigInt),
    (MESSAGE_CHANGE_PARAMETER_FEE, ParamKind::BigInt),
    ("message_stake_app_fee", ParamKind::BigInt),
    ("message_stake_servicer_fee", ParamKind::BigInt),
    ("message_stake_fisherman_fee", ParamKind::BigInt),
    ("message_stake_validator_fee", ParamKind::BigInt),
    ("message_edit_stake_app_fee", ParamKind::BigInt),
    ("message_edit_stake_servicer_fee", ParamKind::BigInt),
    ("message_edit_stake_fisherman_fee", ParamKind::BigInt),
    ("message_edit_stake_validator_fee", ParamKind::BigInt),
    ("message_unstake_app_fee", ParamKind::BigInt),
    ("message_unstake_servicer_fee", ParamKind::BigInt),
    ("message_unstake_fisherman_fee", ParamKind::BigInt),
    ("message_unstake_validator_fee", ParamKind::BigInt),
    ("message_pause_app_fee", ParamKind::BigInt),
    ("message_pause_servicer_fee", ParamKind::BigInt),
    ("message_pause_fisherman_fee", ParamKind::BigInt),
    ("message_pause_validator_fee", ParamKind::BigInt),
    ("message_unpause_app_fee", ParamKind::BigInt),
    ("message_unpause_servicer_fee", ParamKind::BigInt),
    ("message_unpause_fisherman_fee", ParamKind::BigInt),
    ("message_unpause_validator_fee", ParamKind::BigInt),
];

fn base_kind(name: &str) -> Option<ParamKind> {
    BASE_PARAMS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, kind)| *kind)
}

/// Declared type of any registered parameter, owner parameters included.
pub fn param_kind(name: &str) -> Option<ParamKind> {
    if name == ACL_OWNER {
        return Some(ParamKind::Address);
    }
    if let Some(kind) = base_kind(name) {
        return Some(kind);
    }
    name.strip_suffix(OWNER_SUFFIX)
        .and_then(base_kind)
        .map(|_| ParamKind::Address)
}

/// Values an integer parameter may take. Percentages stay within 0..=100,
/// sessions last at least one block, and every other count is non-negative.
/// The staking adjustment is the only signed parameter.
pub fn int_param_range(name: &str) -> RangeInclusive<i32> {
    match name {
        PROPOSER_PERCENTAGE_OF_FEES
        | MISSED_BLOCKS_BURN_PERCENTAGE
        | DOUBLE_SIGN_BURN_PERCENTAGE => 0..=100,
        BLOCKS_PER_SESSION => 1..=i32::MAX,
        APP_STAKING_ADJUSTMENT => i32::MIN..=i32::MAX,
        _ => 0..=i32::MAX,
    }
}

/// Name of the parameter holding the owner of `name`.
pub fn owner_param_name(name: &str) -> Option<String> {
    if base_kind(name).is_some() {
        return Some(format!("{name}{OWNER_SUFFIX}"));
    }
    param_kind(name).map(|_| ACL_OWNER.to_string())
}

/// Every registered name: base parameters, their owner slots, then `acl_owner`.
pub fn all_param_names() -> impl Iterator<Item = String> {
    BASE_PARAMS
        .iter()
        .map(|(name, _)| name.to_string())
        .chain(
            BASE_PARAMS
                .iter()
                .map(|(name, _)| format!("{name}{OWNER_SUFFIX}")),
        )
        .chain(std::iter::once(ACL_OWNER.to_string()))
}

// =============================================================================
// PER-KIND NAMES
// =============================================================================

pub fn minimum_stake(actor_type: ActorType) -> &'static str {
    match actor_type {
        ActorType::Application => "app_minimum_stake",
        ActorType::Servicer => "servicer_minimum_stake",
        ActorType::Fisherman => "fisherman_minimum_stake",
        ActorType::Validator => "validator_minimum_stake",
    }
}

/// `None` for validators, which carry no chains.
pub fn max_chains(actor_type: ActorType) -> Option<&'static str> {
    match actor_type {
        ActorType::Application => Some("app_max_chains"),
        ActorType::Servicer => Some("servicer_max_chains"),
        ActorType::Fisherman => Some("fisherman_max_chains"),
        ActorType::Validator => None,
    }
}

pub fn unstaking_blocks(actor_type: ActorType) -> &'static str {
    match actor_type {
        ActorType::Application => "app_unstaking_blocks",
        ActorType::Servicer => "servicer_unstaking_blocks",
        ActorType::Fisherman => "fisherman_unstaking_blocks",
        ActorType::Validator => "validator_unstaking_blocks",
    }
}

pub fn minimum_pause_blocks(actor_type: ActorType) -> &'static str {
    match actor_type {
        ActorType::Application => "app_minimum_pause_blocks",
        ActorType::Servicer => "servicer_minimum_pause_blocks",
        ActorType::Fisherman => "fisherman_minimum_pause_blocks",
        ActorType::Validator => "validator_minimum_pause_blocks",
    }
}

pub fn max_pause_blocks(actor_type: ActorType) -> &'static str {
    match actor_type {
        ActorType::Application => "app_max_pause_blocks",
        ActorType::Servicer => "servicer_max_pause_blocks",
        ActorType::Fisherman => "fisherman_max_pause_blocks",
        ActorType::Validator => "validator_max_pause_blocks",
    }
}

/// Fee parameter names for the stake-family messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeFeeKind {
    Stake,
    EditStake,
    Unstake,
    Pause,
    Unpause,
}

pub fn stake_fee(fee: StakeFeeKind, actor_type: ActorType) -> &'static str {
    use ActorType::*;
    use StakeFeeKind::*;
    match (fee, actor_type) {
        (Stake, Application) => "message_stake_app_fee",
        (Stake, Servicer) => "message_stake_servicer_fee",
        (Stake, Fisherman) => "message_stake_fisherman_fee",
        (Stake, Validator) => "message_stake_validator_fee",
        (EditStake, Application) => "message_edit_stake_app_fee",
        (EditStake, Servicer) => "message_edit_stake_servicer_fee",
        (EditStake, Fisherman) => "message_edit_stake_fisherman_fee",
        (EditStake, Validator) => "message_edit_stake_validator_fee",
        (Unstake, Application) => "message_unstake_app_fee",
        (Unstake, Servicer) => "message_unstake_servicer_fee",
        (Unstake, Fisherman) => "message_unstake_fisherman_fee",
        (Unstake, Validator) => "message_unstake_validator_fee",
        (Pause, Application) => "message_pause_app_fee",
        (Pause, Servicer) => "message_pause_servicer_fee",
        (Pause, Fisherman) => "message_pause_fisherman_fee",
        (Pause, Validator) => "message_pause_validator_fee",
        (Unpause, Application) => "message_unpause_app_fee",
        (Unpause, Servicer) => "message_unpause_servicer_fee",
        (Unpause, Fisherman) => "message_unpause_fisherman_fee",
        (Unpause, Validator) => "message_unpause_validator_fee",
    }
}
