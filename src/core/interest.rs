//! Interest and collateral arithmetic
//!
//! All math is integer-truncating. Interest is a step function of whole
//! elapsed years: nothing accrues before the first full year.

use crate::core::config::SECONDS_PER_YEAR;
use crate::types::{Amount, Timestamp};

/// Interest accrued on `principal` at `rate_percent` over `elapsed` clock units
///
/// Computes `floor(principal * rate / 100) * floor(elapsed / SECONDS_PER_YEAR)`.
/// Returns `None` if the result does not fit in an `Amount`.
pub fn interest(principal: Amount, rate_percent: u64, elapsed: u64) -> Option<Amount> {
    let annual = u128::from(principal) * u128::from(rate_percent) / 100;
    let years = u128::from(elapsed / SECONDS_PER_YEAR);

    annual
        .checked_mul(years)
        .and_then(|total| Amount::try_from(total).ok())
}

/// Elapsed time between an accrual anchor and `now`
///
/// The clock is monotonic, so an anchor in the future only happens on a
/// misconfigured clock and is treated as zero elapsed time.
pub fn elapsed(anchor: Timestamp, now: Timestamp) -> u64 {
    now.saturating_sub(anchor)
}

/// Collateral required for a loan of `amount` at `ratio_percent`
///
/// `floor(amount * ratio / 100)`, computed without overflow.
pub fn required_collateral(amount: Amount, ratio_percent: u64) -> u128 {
    u128::from(amount) * u128::from(ratio_percent) / 100
}
