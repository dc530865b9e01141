//! Typed governance parameter access, fees and ACL owners.
//!
//! Reads go through the previous height's view; writes land in the working
//! state and take effect for the next block.

use shared_crypto::ADDRESS_LEN;
use shared_types::{parse_amount, Address, Amount, ParamValue};

use super::UnitOfWork;
use crate::domain::{int_param_range, owner_param_name, param_kind, Message, ParamKind};
use crate::error::{PersistenceResultExt, Result, UtilityError};

impl UnitOfWork {
    /// Raw value of a registered parameter.
    pub fn get_parameter(&self, name: &str) -> Result<ParamValue> {
        if param_kind(name).is_none() {
            return Err(UtilityError::UnknownParam(name.to_string()));
        }
        self.read_context
            .get_parameter(name)
            .during("get_parameter")?
            .ok_or_else(|| UtilityError::ParamNotSet(name.to_string()))
    }

    pub fn get_int_param(&self, name: &str) -> Result<i32> {
        match self.get_parameter(name)? {
            ParamValue::Int(value) => Ok(value),
            other => Err(mismatch(name, ParamKind::Int, &other)),
        }
    }

    pub fn get_big_int_param(&self, name: &str) -> Result<Amount> {
        let value = self.get_parameter(name)?;
        big_int_value(name, &value)
    }

    pub fn get_address_param(&self, name: &str) -> Result<Address> {
        let value = self.get_parameter(name)?;
        address_value(name, &value)
    }

    /// Integer parameter counted in blocks. Negative values are invalid.
    pub(crate) fn get_blocks_param(&self, name: &str) -> Result<u64> {
        let value = self.get_int_param(name)?;
        u64::try_from(value).map_err(|_| UtilityError::InvalidParamValue {
            name: name.to_string(),
            reason: format!("{value} is negative"),
        })
    }

    /// Fee charged for `message`.
    pub fn get_fee(&self, message: &Message) -> Result<Amount> {
        self.get_big_int_param(message.fee_param_name())
    }

    /// Address allowed to change `name`.
    pub fn get_param_owner(&self, name: &str) -> Result<Address> {
        let owner_param =
            owner_param_name(name).ok_or_else(|| UtilityError::UnknownParam(name.to_string()))?;
        self.get_address_param(&owner_param)
    }

    /// Type- and range-checked write. Authorization is the caller's concern.
    ///
    /// # Errors
    /// - `ParamTypeMismatch`: value tag differs from the declared type
    /// - `InvalidParamValue`: integer out of range, bad decimal or address
    pub fn update_param(&mut self, name: &str, value: ParamValue) -> Result<()> {
        self.ensure_open()?;
        let kind = param_kind(name).ok_or_else(|| UtilityError::UnknownParam(name.to_string()))?;
        match kind {
            ParamKind::Int => {
                let &ParamValue::Int(v) = &value else {
                    return Err(mismatch(name, kind, &value));
                };
                let range = int_param_range(name);
                if !range.contains(&v) {
                    return Err(UtilityError::InvalidParamValue {
                        name: name.to_string(),
                        reason: format!("{v} is outside {}..={}", range.start(), range.end()),
                    });
                }
            }
            ParamKind::BigInt => {
                big_int_value(name, &value)?;
            }
            ParamKind::Address => {
                address_value(name, &value)?;
            }
        }
        self.rw_context
            .set_parameter(name, value)
            .during("set_parameter")
    }
}

fn mismatch(name: &str, expected: ParamKind, actual: &ParamValue) -> UtilityError {
    UtilityError::ParamTypeMismatch {
        name: name.to_string(),
        expected,
        actual: actual.type_name(),
    }
}

fn big_int_value(name: &str, value: &ParamValue) -> Result<Amount> {
    match value {
        ParamValue::String(s) => parse_amount(s).map_err(|_| UtilityError::InvalidParamValue {
            name: name.to_string(),
            reason: format!("{s:?} is not a decimal integer"),
        }),
        other => Err(mismatch(name, ParamKind::BigInt, other)),
    }
}

fn address_value(name: &str, value: &ParamValue) -> Result<Address> {
    match value {
        ParamValue::Bytes(bytes) => {
            Address::try_from(bytes.as_slice()).map_err(|_| UtilityError::InvalidParamValue {
                name: name.to_string(),
                reason: format!("expected {ADDRESS_LEN} bytes, got {}", bytes.len()),
            })
        }
        other => Err(mismatch(name, ParamKind::Address, other)),
    }
}
