//! Integer arithmetic for relays, burns and fee distribution.
//!
//! All results are exact and floor-rounded so every node agrees.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use shared_types::Amount;

use crate::error::{Result, UtilityError};

/// Stake units per relay-rate unit.
const STAKE_UNIT: u64 = 1_000_000;

/// `floor((baseline_rate / 100) * (stake / 1_000_000) + adjustment)`,
/// saturated to the `i64` range.
pub fn calculate_app_relays(stake: &Amount, baseline_rate: i32, adjustment: i32) -> i64 {
    let denominator = BigInt::from(100u64 * STAKE_UNIT);
    let numerator = BigInt::from(baseline_rate) * BigInt::from(stake.clone())
        + BigInt::from(adjustment) * &denominator;
    let relays = numerator.div_floor(&denominator);
    relays.to_i64().unwrap_or(if relays.is_positive() {
        i64::MAX
    } else {
        i64::MIN
    })
}

/// Stake remaining after a burn: `floor(stake * percentage / 100)`, clamped
/// to `[0, stake]`.
pub fn stake_after_burn(stake: &Amount, percentage: i32) -> Amount {
    match percentage {
        p if p <= 0 => Amount::zero(),
        p if p >= 100 => stake.clone(),
        p => stake * Amount::from(p as u32) / Amount::from(100u32),
    }
}

/// Split collected fees into `(proposer_cut, dao_cut)`.
pub fn split_fees(fees: &Amount, proposer_percentage: i32) -> Result<(Amount, Amount)> {
    if !(0..=100).contains(&proposer_percentage) {
        return Err(UtilityError::InvalidProposerCutPercentage(
            proposer_percentage,
        ));
    }
    let proposer_cut = fees * Amount::from(proposer_percentage as u32) / Amount::from(100u32);
    let dao_cut = fees - &proposer_cut;
    Ok((proposer_cut, dao_cut))
}
