//! Common types used across the sale protocol.

use odra::prelude::*;
use odra::casper_types::account::AccountHash;
use odra::casper_types::{U256, U512};

/// Immutable sale round configuration, written once at init.
#[odra::odra_type]
pub struct SaleConfig {
    /// Maximum amount of sale tokens sellable in this round (18 decimals)
    pub total_reward: U256,
    /// Sale token contract address
    pub sale_token: Address,
    /// Linear vesting duration in months
    pub vesting_months: u32,
    /// Percent of each purchase released immediately (0-100)
    pub percent_immediate: u32,
    /// Token price in 6-decimal USD per whole token (0.07 USD = 70_000)
    pub token_price_usd: U256,
    /// First accepted stablecoin (6 decimals, 1:1 USD)
    pub stable_a: Address,
    /// Second accepted stablecoin (6 decimals, 1:1 USD)
    pub stable_b: Address,
    /// Native-coin price adapter contract
    pub price_adapter: Address,
    /// Maximum single payment in 6-decimal USD
    pub max_contribution: U256,
    /// Minimum single payment in 6-decimal USD
    pub min_contribution: U256,
    /// Platform owner address (admin + fee recipient)
    pub platform_owner: Address,
}

impl Default for SaleConfig {
    fn default() -> Self {
        let zero = Address::Account(AccountHash::new([0u8; 32]));
        Self {
            total_reward: U256::zero(),
            sale_token: zero,
            vesting_months: 0,
            percent_immediate: 0,
            token_price_usd: U256::zero(),
            stable_a: zero,
            stable_b: zero,
            price_adapter: zero,
            max_contribution: U256::zero(),
            min_contribution: U256::zero(),
            platform_owner: zero,
        }
    }
}

/// Per-buyer cumulative purchase and claim state.
///
/// `amount_claimed` includes the immediately released portion of every
/// purchase, so `claimable = vested - amount_claimed` never double-pays.
#[odra::odra_type]
#[derive(Default)]
pub struct Contribution {
    /// Total sale tokens purchased (18 decimals)
    pub total_purchased: U256,
    /// Sale tokens already released to the buyer (18 decimals)
    pub amount_claimed: U256,
    /// Timestamp of the first purchase, in seconds (vesting anchor)
    pub first_purchase_time: u64,
}

/// Snapshot of the round returned by `get_info`.
#[odra::odra_type]
pub struct SaleInfo {
    /// Sale token contract address
    pub sale_token: Address,
    /// Maximum sellable amount (18 decimals)
    pub total_reward: U256,
    /// Percent released immediately (0-100)
    pub percent_immediate: u32,
    /// Tokens sold so far (18 decimals)
    pub total_sold: U256,
    /// Vesting duration in months
    pub vesting_months: u32,
    /// Maximum single payment in 6-decimal USD
    pub max_contribution: U256,
    /// Minimum single payment in 6-decimal USD
    pub min_contribution: U256,
    /// Token price in 6-decimal USD per whole token
    pub token_price_usd: U256,
}

/// Funds collected by the round, per currency class.
#[odra::odra_type]
pub struct CollectedFunds {
    /// Native coin received, in motes
    pub native: U512,
    /// Stablecoin USD received across both accepted stables (6 decimals)
    pub usd: U256,
}
