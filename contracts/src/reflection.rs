//! Reflection rate math for the sale token.
//!
//! Token balances of included accounts are stored in a higher-precision
//! reflection unit. The global exchange rate between the two units is
//! `reflection_total / token_total`; removing the reflect share of a transfer
//! fee from `reflection_total` shrinks the rate, which raises every included
//! holder's implied token balance in O(1).
//!
//! Overflow bound: `reflection_total` starts at the largest multiple of the
//! supply below `U256::MAX`, and only ever shrinks. For any tracked amount
//! `t <= token_total`, `t * rate <= token_total * rate <= reflection_total`,
//! so reflection-unit products never overflow U256.

use odra::prelude::*;
use odra::casper_types::U256;

/// Buyback pool share, percent of the transfer fee
pub const POOL_BUYBACK_PERCENT: u64 = 30;

/// Community reward pool share, percent of the transfer fee
pub const POOL_COMMUNITY_PERCENT: u64 = 30;

/// Provide-liquidity pool share, percent of the transfer fee
pub const POOL_LIQUIDITY_PERCENT: u64 = 20;

/// Global unit-exchange state between token units and reflection units.
#[odra::odra_type]
#[derive(Copy)]
pub struct ReflectionTotals {
    /// Circulating reflection units; shrinks on reflect fees and burns
    pub reflection_total: U256,
    /// Token supply; shrinks only on burns
    pub token_total: U256,
}

impl ReflectionTotals {
    /// Initial state: the reflection total is the largest multiple of the
    /// supply below `U256::MAX`, so the starting rate divides exactly.
    pub fn new(total_supply: U256) -> Self {
        let reflection_total = U256::MAX - (U256::MAX % total_supply);
        Self {
            reflection_total,
            token_total: total_supply,
        }
    }

    /// Current reflection units per token unit.
    pub fn rate(&self) -> U256 {
        if self.token_total.is_zero() {
            return U256::zero();
        }
        self.reflection_total / self.token_total
    }

    /// Remove a reflect fee from circulation at the given rate.
    ///
    /// The rate must be read once per transfer, before any mutation, so
    /// every conversion within that transfer sees the same rate.
    pub fn shrink(&mut self, t_reflect: U256, rate: U256) {
        self.reflection_total -= t_reflect * rate;
    }

    /// Burn supply: both totals shrink proportionally, leaving the rate
    /// (and thus every other holder's balance) unchanged.
    pub fn burn(&mut self, t_amount: U256, rate: U256) {
        self.reflection_total -= t_amount * rate;
        self.token_total -= t_amount;
    }
}

/// Token-unit breakdown of one transfer's fee.
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct TransferFee {
    /// Share removed from `reflection_total` (redistributed to holders)
    pub reflect: U256,
    /// Share credited to the buyback pool
    pub buyback: U256,
    /// Share credited to the community reward pool
    pub community_reward: U256,
    /// Share credited to the provide-liquidity pool
    pub provide_liquidity: U256,
}

impl TransferFee {
    /// Split `amount * fee_percent / 100` into pool shares and a reflect
    /// remainder. The remainder assignment keeps the split exact.
    pub fn compute(amount: U256, fee_percent: u32) -> Self {
        let fee_total = amount * U256::from(fee_percent) / U256::from(100u64);
        let buyback = fee_total * U256::from(POOL_BUYBACK_PERCENT) / U256::from(100u64);
        let community_reward = fee_total * U256::from(POOL_COMMUNITY_PERCENT) / U256::from(100u64);
        let provide_liquidity = fee_total * U256::from(POOL_LIQUIDITY_PERCENT) / U256::from(100u64);

        Self {
            reflect: fee_total - buyback - community_reward - provide_liquidity,
            buyback,
            community_reward,
            provide_liquidity,
        }
    }

    /// Total fee deducted from the transferred amount.
    pub fn total(&self) -> U256 {
        self.reflect + self.pools_total()
    }

    /// Portion credited to the three pool ledgers.
    pub fn pools_total(&self) -> U256 {
        self.buyback + self.community_reward + self.provide_liquidity
    }

    pub fn is_zero(&self) -> bool {
        self.total().is_zero()
    }
}

/// Net amount and fee breakdown for one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    /// Amount credited to the receiver
    pub net: U256,
    /// Fee deducted from the sender's amount
    pub fee: TransferFee,
}

impl TransferPlan {
    /// Plan a transfer: fee-exempt endpoints move the full amount.
    pub fn plan(amount: U256, fee_percent: u32, fee_exempt: bool) -> Self {
        let fee = if fee_exempt {
            TransferFee::default()
        } else {
            TransferFee::compute(amount, fee_percent)
        };

        Self {
            net: amount - fee.total(),
            fee,
        }
    }
}
