//! Message dispatch and signer resolution.

use shared_types::{ActorType, Address};
use tracing::info;

use super::UnitOfWork;
use crate::domain::{
    Message, MessageChangeParameter, MessageDoubleSign, SignerCandidates,
    DOUBLE_SIGN_BURN_PERCENTAGE, VALIDATOR_MAX_EVIDENCE_AGE_IN_BLOCKS,
};
use crate::error::{Result, UtilityError};

impl UnitOfWork {
    /// Addresses allowed to sign `message`.
    pub fn signer_candidates(&self, message: &Message) -> Result<SignerCandidates> {
        match message {
            Message::Send(m) => Ok(SignerCandidates::OneOf(vec![m.from_address])),
            Message::Stake(m) => Ok(SignerCandidates::OneOf(vec![
                m.output_address,
                m.actor_address(),
            ])),
            Message::EditStake(m) => self.operator_candidates(m.actor_type, &m.address),
            Message::Unstake(m) => self.operator_candidates(m.actor_type, &m.address),
            Message::Pause(m) => self.operator_candidates(m.actor_type, &m.address),
            Message::Unpause(m) => self.operator_candidates(m.actor_type, &m.address),
            Message::ChangeParameter(m) => Ok(SignerCandidates::OneOf(vec![
                self.get_param_owner(&m.parameter_key)?,
            ])),
            Message::DoubleSign(_) => Ok(SignerCandidates::Any),
        }
    }

    /// Output and operator address of an existing actor.
    fn operator_candidates(
        &self,
        actor_type: ActorType,
        address: &Address,
    ) -> Result<SignerCandidates> {
        let actor = self.get_actor(actor_type, address)?;
        Ok(SignerCandidates::OneOf(vec![
            actor.output_address,
            actor.address,
        ]))
    }

    /// Apply a message whose signer has been stamped by ante-handling.
    pub(crate) fn handle_message(&mut self, message: &Message) -> Result<()> {
        match message {
            Message::Send(m) => {
                self.subtract_account_amount(&m.from_address, &m.amount)?;
                self.add_account_amount(&m.to_address, &m.amount)
            }
            Message::Stake(m) => self.stake(m),
            Message::EditStake(m) => self.edit_stake(m),
            Message::Unstake(m) => self.unstake(m),
            Message::Pause(m) => self.pause(m),
            Message::Unpause(m) => self.unpause(m),
            Message::ChangeParameter(m) => self.change_parameter(m),
            Message::DoubleSign(m) => self.double_sign(m),
        }
    }

    fn change_parameter(&mut self, msg: &MessageChangeParameter) -> Result<()> {
        let signer = msg.signer.ok_or(UtilityError::SignerNotSet)?;
        let owner = self.get_param_owner(&msg.parameter_key)?;
        if signer != owner || msg.owner != owner {
            return Err(UtilityError::InvalidSigner { signer });
        }
        self.update_param(&msg.parameter_key, msg.parameter_value.clone())?;
        info!(
            height = self.height,
            param = %msg.parameter_key,
            value = ?msg.parameter_value,
            "[qc-17] Parameter changed"
        );
        Ok(())
    }

    fn double_sign(&mut self, msg: &MessageDoubleSign) -> Result<()> {
        let evidence_height = msg.vote_a.height;
        let max_age = self.get_blocks_param(VALIDATOR_MAX_EVIDENCE_AGE_IN_BLOCKS)?;
        if evidence_height > self.height || self.height - evidence_height > max_age {
            return Err(UtilityError::EvidenceOutOfWindow {
                evidence_height,
                current_height: self.height,
                max_age,
            });
        }
        let percentage = self.get_int_param(DOUBLE_SIGN_BURN_PERCENTAGE)?;
        self.burn_validator(&msg.double_signer(), percentage)
    }
}
