//! # Core Domain Entities
//!
//! Ledger-side records manipulated by the state-transition engine.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `Hash`
//! - **Staking**: `ActorType`, `StakeStatus`, `Actor`
//! - **Ledger**: `Pool`, amount helpers
//! - **Governance**: `ParamValue`

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::errors::ValidationError;

/// A 32-byte SHA3-256 hash.
pub type Hash = [u8; 32];

/// A 20-byte account address, the SHA-256 prefix of a public key.
pub type Address = [u8; 20];

/// Arbitrary-precision non-negative token amount.
pub type Amount = BigUint;

/// Parse a base-10 amount string.
pub fn parse_amount(value: &str) -> Result<Amount, ValidationError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAmount(value.to_string()));
    }
    BigUint::from_str(value).map_err(|_| ValidationError::InvalidAmount(value.to_string()))
}

// =============================================================================
// STAKING
// =============================================================================

/// The four kinds of staked participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorType {
    Application,
    Servicer,
    Fisherman,
    Validator,
}

impl ActorType {
    /// All kinds, in the order sweeps visit them.
    pub const ALL: [ActorType; 4] = [
        ActorType::Application,
        ActorType::Servicer,
        ActorType::Fisherman,
        ActorType::Validator,
    ];

    /// Prefix used in governance parameter names (`app_minimum_stake`, ...).
    pub fn param_prefix(self) -> &'static str {
        match self {
            ActorType::Application => "app",
            ActorType::Servicer => "servicer",
            ActorType::Fisherman => "fisherman",
            ActorType::Validator => "validator",
        }
    }

    /// The pool holding this kind's stake.
    pub fn stake_pool(self) -> Pool {
        match self {
            ActorType::Application => Pool::AppStake,
            ActorType::Servicer => Pool::ServicerStake,
            ActorType::Fisherman => Pool::FishermanStake,
            ActorType::Validator => Pool::ValidatorStake,
        }
    }

    /// Validators do not serve relay chains.
    pub fn has_chains(self) -> bool {
        self != ActorType::Validator
    }

    /// Applications consume relays and do not expose a service URL.
    pub fn has_service_url(self) -> bool {
        self != ActorType::Application
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_prefix())
    }
}

/// Stake lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakeStatus {
    Staked,
    Unstaking,
    /// Terminal. Records are deleted once funds are returned, so this is only
    /// observed in reports about removed actors.
    Unstaked,
}

impl fmt::Display for StakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StakeStatus::Staked => "staked",
            StakeStatus::Unstaking => "unstaking",
            StakeStatus::Unstaked => "unstaked",
        };
        f.write_str(s)
    }
}

/// A staked participant.
///
/// Invariants:
/// - `paused_height.is_some()` implies `status == Staked`
/// - `unstaking_height.is_some()` implies `status == Unstaking`
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub actor_type: ActorType,
    pub address: Address,
    pub public_key: Vec<u8>,
    /// Recipient of returned stake.
    pub output_address: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub staked_amount: Amount,
    /// Relay chains served. Always empty for validators.
    pub chains: Vec<String>,
    /// Public endpoint. `None` for applications.
    pub service_url: Option<String>,
    /// Relay throughput derived from stake. Applications only.
    pub max_relays: Option<i64>,
    pub paused_height: Option<u64>,
    pub unstaking_height: Option<u64>,
    pub status: StakeStatus,
    /// Consecutive blocks reported missed. Validators only.
    pub missed_blocks: u32,
}

impl Actor {
    /// A freshly staked actor, neither paused nor unstaking.
    pub fn staked(
        actor_type: ActorType,
        address: Address,
        public_key: Vec<u8>,
        output_address: Address,
        staked_amount: Amount,
    ) -> Self {
        Self {
            actor_type,
            address,
            public_key,
            output_address,
            staked_amount,
            chains: Vec::new(),
            service_url: None,
            max_relays: None,
            paused_height: None,
            unstaking_height: None,
            status: StakeStatus::Staked,
            missed_blocks: 0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_height.is_some()
    }

    /// Begin unbonding; clears any pause so the invariants keep holding.
    pub fn begin_unstaking(&mut self, unstaking_height: u64) {
        self.status = StakeStatus::Unstaking;
        self.unstaking_height = Some(unstaking_height);
        self.paused_height = None;
    }
}

// =============================================================================
// LEDGER
// =============================================================================

/// Protocol-owned accounts, addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pool {
    AppStake,
    ServicerStake,
    FishermanStake,
    ValidatorStake,
    FeeCollector,
    Dao,
}

impl Pool {
    pub const ALL: [Pool; 6] = [
        Pool::AppStake,
        Pool::ServicerStake,
        Pool::FishermanStake,
        Pool::ValidatorStake,
        Pool::FeeCollector,
        Pool::Dao,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pool::AppStake => "app_stake_pool",
            Pool::ServicerStake => "servicer_stake_pool",
            Pool::FishermanStake => "fisherman_stake_pool",
            Pool::ValidatorStake => "validator_stake_pool",
            Pool::FeeCollector => "fee_collector",
            Pool::Dao => "dao",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// GOVERNANCE
// =============================================================================

/// Protocol-level parameter value.
///
/// Big-integer parameters (minimum stakes, fees) travel as `String`;
/// owner parameters travel as `Bytes` holding an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i32),
    String(String),
    Bytes(Vec<u8>),
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "int32",
            ParamValue::String(_) => "string",
            ParamValue::Bytes(_) => "bytes",
        }
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value)
    }
}

impl From<&Amount> for ParamValue {
    fn from(value: &Amount) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<Address> for ParamValue {
    fn from(value: Address) -> Self {
        ParamValue::Bytes(value.to_vec())
    }
}
