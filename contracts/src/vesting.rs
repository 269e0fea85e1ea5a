//! Vesting schedule for purchased allocations.
//!
//! Each buyer's allocation splits into an immediately released fraction and
//! a remainder released linearly, month by month, from the first purchase:
//! - immediate = total * percent_immediate / 100
//! - linear    = total - immediate, released over `vesting_months`
//!
//! The schedule is a pure function of the contribution and the clock, so the
//! round can evaluate it without touching storage twice.

use odra::casper_types::U256;

use crate::types::Contribution;

/// Seconds in a vesting month (30 days)
pub const MONTH_SECONDS: u64 = 2_592_000;

/// Percent scale (100% = 100)
pub const PERCENT_SCALE: u64 = 100;

/// Amount of a contribution vested at `now` (seconds).
///
/// Monotonic non-decreasing in `now`; equals the immediate fraction at the
/// first-purchase instant and the full `total_purchased` once
/// `vesting_months` whole months have elapsed.
pub fn vested_amount(
    total_purchased: U256,
    percent_immediate: u32,
    first_purchase_time: u64,
    vesting_months: u32,
    now: u64,
) -> U256 {
    if total_purchased.is_zero() || now < first_purchase_time {
        return U256::zero();
    }

    let immediate = total_purchased * U256::from(percent_immediate) / U256::from(PERCENT_SCALE);
    let linear = total_purchased - immediate;

    if vesting_months == 0 {
        return total_purchased;
    }

    let months_elapsed = (now - first_purchase_time) / MONTH_SECONDS;
    let months_elapsed = months_elapsed.min(vesting_months as u64);

    immediate + linear * U256::from(months_elapsed) / U256::from(vesting_months)
}

/// Amount claimable right now: vested minus already claimed.
pub fn claimable(
    contribution: &Contribution,
    percent_immediate: u32,
    vesting_months: u32,
    now: u64,
) -> U256 {
    let vested = vested_amount(
        contribution.total_purchased,
        percent_immediate,
        contribution.first_purchase_time,
        vesting_months,
        now,
    );

    vested.saturating_sub(contribution.amount_claimed)
}
