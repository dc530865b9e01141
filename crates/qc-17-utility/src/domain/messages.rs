//! # Transaction Messages
//!
//! Each message is carried inside a transaction as an [`Any`] tagged with its
//! type URL. Amounts are decimal strings on the wire and arbitrary-precision
//! integers in memory.
//!
//! | Message | Signer candidates | Fee parameter |
//! |---------|-------------------|---------------|
//! | `Send` | `from_address` | `message_send_fee` |
//! | `Stake` | output address, address of `public_key` | `message_stake_<kind>_fee` |
//! | `EditStake` | actor output address, actor address | `message_edit_stake_<kind>_fee` |
//! | `Unstake` | actor output address, actor address | `message_unstake_<kind>_fee` |
//! | `Pause` | actor output address, actor address | `message_pause_<kind>_fee` |
//! | `Unpause` | actor output address, actor address | `message_unpause_<kind>_fee` |
//! | `ChangeParameter` | owner of `parameter_key` | `message_change_parameter_fee` |
//! | `DoubleSign` | anyone | `message_double_sign_fee` |

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use shared_crypto::{address_from_public_key, Ed25519PublicKey};
use shared_types::{
    from_any, to_any, ActorType, Address, Amount, Any, CodecError, Hash, ParamValue, TypeUrl,
    ValidationError,
};

use crate::domain::params::{
    stake_fee, StakeFeeKind, MESSAGE_CHANGE_PARAMETER_FEE, MESSAGE_DOUBLE_SIGN_FEE,
    MESSAGE_SEND_FEE,
};
use crate::error::{Result, UtilityError};

/// Required length of a relay chain identifier.
pub const RELAY_CHAIN_LENGTH: usize = 4;

const MAX_PORT: u32 = 65_535;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSend {
    pub from_address: Address,
    pub to_address: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStake {
    pub actor_type: ActorType,
    pub public_key: Vec<u8>,
    pub chains: Vec<String>,
    pub service_url: Option<String>,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,
    pub output_address: Address,
    pub signer: Option<Address>,
}

impl MessageStake {
    /// Address the new actor is keyed by.
    pub fn actor_address(&self) -> Address {
        address_from_public_key(&self.public_key)
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEditStake {
    pub actor_type: ActorType,
    pub address: Address,
    pub chains: Vec<String>,
    pub service_url: Option<String>,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,
    pub signer: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUnstake {
    pub actor_type: ActorType,
    pub address: Address,
    pub signer: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePause {
    pub actor_type: ActorType,
    pub address: Address,
    pub signer: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUnpause {
    pub actor_type: ActorType,
    pub address: Address,
    pub signer: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChangeParameter {
    pub owner: Address,
    pub parameter_key: String,
    pub parameter_value: ParamValue,
    pub signer: Option<Address>,
}

/// One consensus vote, as carried in double-sign evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub public_key: Vec<u8>,
    pub height: u64,
    pub round: u32,
    pub vote_type: u8,
    pub block_hash: Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDoubleSign {
    pub vote_a: Vote,
    pub vote_b: Vote,
    pub reporter_address: Option<Address>,
}

impl MessageDoubleSign {
    /// Validator that signed both votes.
    pub fn double_signer(&self) -> Address {
        address_from_public_key(&self.vote_a.public_key)
    }
}

macro_rules! type_url {
    ($($ty:ty => $url:literal),* $(,)?) => {
        $(impl TypeUrl for $ty {
            const TYPE_URL: &'static str = $url;
        })*
    };
}

type_url! {
    MessageSend => "/utility.MessageSend",
    MessageStake => "/utility.MessageStake",
    MessageEditStake => "/utility.MessageEditStake",
    MessageUnstake => "/utility.MessageUnstake",
    MessagePause => "/utility.MessagePause",
    MessageUnpause => "/utility.MessageUnpause",
    MessageChangeParameter => "/utility.MessageChangeParameter",
    MessageDoubleSign => "/utility.MessageDoubleSign",
}

/// Who may authorize a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerCandidates {
    Any,
    OneOf(Vec<Address>),
}

impl SignerCandidates {
    pub fn allows(&self, signer: &Address) -> bool {
        match self {
            SignerCandidates::Any => true,
            SignerCandidates::OneOf(candidates) => candidates.contains(signer),
        }
    }
}

/// A decoded transaction message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Send(MessageSend),
    Stake(MessageStake),
    EditStake(MessageEditStake),
    Unstake(MessageUnstake),
    Pause(MessagePause),
    Unpause(MessageUnpause),
    ChangeParameter(MessageChangeParameter),
    DoubleSign(MessageDoubleSign),
}

impl Message {
    /// Decode by type URL.
    pub fn from_any(any: &Any) -> Result<Self> {
        let msg = match any.type_url.as_str() {
            MessageSend::TYPE_URL => Message::Send(from_any(any)?),
            MessageStake::TYPE_URL => Message::Stake(from_any(any)?),
            MessageEditStake::TYPE_URL => Message::EditStake(from_any(any)?),
            MessageUnstake::TYPE_URL => Message::Unstake(from_any(any)?),
            MessagePause::TYPE_URL => Message::Pause(from_any(any)?),
            MessageUnpause::TYPE_URL => Message::Unpause(from_any(any)?),
            MessageChangeParameter::TYPE_URL => Message::ChangeParameter(from_any(any)?),
            MessageDoubleSign::TYPE_URL => Message::DoubleSign(from_any(any)?),
            other => return Err(UtilityError::UnknownMessage(other.to_string())),
        };
        Ok(msg)
    }

    pub fn to_any(&self) -> std::result::Result<Any, CodecError> {
        match self {
            Message::Send(m) => to_any(m),
            Message::Stake(m) => to_any(m),
            Message::EditStake(m) => to_any(m),
            Message::Unstake(m) => to_any(m),
            Message::Pause(m) => to_any(m),
            Message::Unpause(m) => to_any(m),
            Message::ChangeParameter(m) => to_any(m),
            Message::DoubleSign(m) => to_any(m),
        }
    }

    /// Short name used in logs and the transaction index.
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::Send(_) => "send",
            Message::Stake(_) => "stake",
            Message::EditStake(_) => "edit_stake",
            Message::Unstake(_) => "unstake",
            Message::Pause(_) => "pause",
            Message::Unpause(_) => "unpause",
            Message::ChangeParameter(_) => "change_parameter",
            Message::DoubleSign(_) => "double_sign",
        }
    }

    /// Actor kind for stake-family messages.
    pub fn actor_type(&self) -> Option<ActorType> {
        match self {
            Message::Stake(m) => Some(m.actor_type),
            Message::EditStake(m) => Some(m.actor_type),
            Message::Unstake(m) => Some(m.actor_type),
            Message::Pause(m) => Some(m.actor_type),
            Message::Unpause(m) => Some(m.actor_type),
            Message::Send(_) | Message::ChangeParameter(_) | Message::DoubleSign(_) => None,
        }
    }

    /// Name of the governance parameter holding this message's fee.
    pub fn fee_param_name(&self) -> &'static str {
        match self {
            Message::Send(_) => MESSAGE_SEND_FEE,
            Message::Stake(m) => stake_fee(StakeFeeKind::Stake, m.actor_type),
            Message::EditStake(m) => stake_fee(StakeFeeKind::EditStake, m.actor_type),
            Message::Unstake(m) => stake_fee(StakeFeeKind::Unstake, m.actor_type),
            Message::Pause(m) => stake_fee(StakeFeeKind::Pause, m.actor_type),
            Message::Unpause(m) => stake_fee(StakeFeeKind::Unpause, m.actor_type),
            Message::ChangeParameter(_) => MESSAGE_CHANGE_PARAMETER_FEE,
            Message::DoubleSign(_) => MESSAGE_DOUBLE_SIGN_FEE,
        }
    }

    /// Stamp the verified signer. `Send` is always signed by its sender.
    pub fn set_signer(&mut self, signer: Address) {
        match self {
            Message::Send(_) => {}
            Message::Stake(m) => m.signer = Some(signer),
            Message::EditStake(m) => m.signer = Some(signer),
            Message::Unstake(m) => m.signer = Some(signer),
            Message::Pause(m) => m.signer = Some(signer),
            Message::Unpause(m) => m.signer = Some(signer),
            Message::ChangeParameter(m) => m.signer = Some(signer),
            Message::DoubleSign(m) => m.reporter_address = Some(signer),
        }
    }

    pub fn signer(&self) -> Option<Address> {
        match self {
            Message::Send(m) => Some(m.from_address),
            Message::Stake(m) => m.signer,
            Message::EditStake(m) => m.signer,
            Message::Unstake(m) => m.signer,
            Message::Pause(m) => m.signer,
            Message::Unpause(m) => m.signer,
            Message::ChangeParameter(m) => m.signer,
            Message::DoubleSign(m) => m.reporter_address,
        }
    }

    /// Stateless checks, identical on every node.
    pub fn validate_basic(&self) -> std::result::Result<(), ValidationError> {
        match self {
            Message::Send(_) | Message::Unstake(_) | Message::Pause(_) | Message::Unpause(_) => {
                Ok(())
            }
            Message::Stake(m) => {
                validate_public_key(&m.public_key)?;
                validate_staker(m.actor_type, &m.chains, m.service_url.as_deref(), true)
            }
            Message::EditStake(m) => {
                validate_staker(m.actor_type, &m.chains, m.service_url.as_deref(), false)
            }
            Message::ChangeParameter(m) => {
                if m.parameter_key.is_empty() {
                    return Err(ValidationError::EmptyParamKey);
                }
                Ok(())
            }
            Message::DoubleSign(m) => validate_evidence(&m.vote_a, &m.vote_b),
        }
    }
}

fn validate_public_key(public_key: &[u8]) -> std::result::Result<(), ValidationError> {
    Ed25519PublicKey::from_slice(public_key)
        .map(|_| ())
        .map_err(ValidationError::InvalidPublicKey)
}

fn validate_staker(
    actor_type: ActorType,
    chains: &[String],
    service_url: Option<&str>,
    service_url_required: bool,
) -> std::result::Result<(), ValidationError> {
    if actor_type.has_chains() {
        validate_relay_chains(chains)?;
    }
    if !actor_type.has_service_url() {
        return Ok(());
    }
    match service_url {
        Some(url) => validate_service_url(url),
        None if service_url_required => Err(ValidationError::InvalidServiceUrl {
            url: String::new(),
            reason: "service URL is required",
        }),
        None => Ok(()),
    }
}

/// Each chain identifier has exactly [`RELAY_CHAIN_LENGTH`] characters.
pub fn validate_relay_chains(chains: &[String]) -> std::result::Result<(), ValidationError> {
    match chains.iter().find(|c| c.len() != RELAY_CHAIN_LENGTH) {
        Some(chain) => Err(ValidationError::InvalidRelayChain {
            chain: chain.clone(),
            expected: RELAY_CHAIN_LENGTH,
        }),
        None => Ok(()),
    }
}

/// `http(s)://host.domain:port` with a numeric port in range.
pub fn validate_service_url(url: &str) -> std::result::Result<(), ValidationError> {
    let invalid = |reason| ValidationError::InvalidServiceUrl {
        url: url.to_string(),
        reason,
    };
    let lower = url.to_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .ok_or_else(|| invalid("scheme must be http or https"))?;
    let (host, port) = rest
        .split_once(':')
        .ok_or_else(|| invalid("port is required"))?;
    if port.contains(':') {
        return Err(invalid("too many colons"));
    }
    let port: u32 = port.parse().map_err(|_| invalid("port is not a number"))?;
    if port > MAX_PORT {
        return Err(invalid("port out of range"));
    }
    if host.is_empty() || !host.contains('.') {
        return Err(invalid("host must contain a period"));
    }
    Ok(())
}

fn validate_evidence(a: &Vote, b: &Vote) -> std::result::Result<(), ValidationError> {
    validate_public_key(&a.public_key)?;
    if a.public_key != b.public_key {
        return Err(ValidationError::InvalidEvidence("votes signed by different keys"));
    }
    if a.height != b.height || a.round != b.round || a.vote_type != b.vote_type {
        return Err(ValidationError::InvalidEvidence(
            "votes are for different height, round or step",
        ));
    }
    if a.block_hash == b.block_hash {
        return Err(ValidationError::InvalidEvidence("votes are for the same block"));
    }
    Ok(())
}
