//! Referral fee cascade.
//!
//! A fixed 10% fee is taken from every purchase and split across up to three
//! ancestor referrers at 5% / 3% / 2% of the payment. An ancestor that is not
//! whitelisted is skipped and its share routes to the platform pool, as does
//! every share past the end of the chain. The platform share is always
//! computed as `fee_total - paid_shares`, so the split is exact in any
//! currency unit.

use odra::prelude::*;
use odra::casper_types::{U256, U512};

/// Total purchase fee, percent of the payment
pub const FEE_PERCENT: u64 = 10;

/// Per-level referral shares, percent of the payment
pub const TIER_PERCENTS: [u64; 3] = [5, 3, 2];

/// Maximum referral chain depth walked per purchase
pub const MAX_REFERRAL_LEVELS: usize = 3;

/// Single payment size (6-decimal USD) that admits a buyer to the whitelist
pub const WHITELIST_THRESHOLD_USD: u64 = 100_000_000;

/// One ancestor in a buyer's referral chain, with its whitelist status
/// at purchase time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLink {
    pub account: Address,
    pub whitelisted: bool,
}

/// Outcome of splitting one payment's fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSplit<T> {
    /// Shares actually paid out, in chain order
    pub tiers: Vec<(Address, T)>,
    /// Share retained by the platform pool
    pub platform: T,
    /// Total fee deducted from the payment
    pub fee_total: T,
}

/// Resolve which ancestor (if any) earns each tier share.
///
/// `None` at a level means that level's share routes to the platform pool.
pub fn resolve_tiers(chain: &[ChainLink]) -> [Option<Address>; 3] {
    let mut recipients = [None; 3];
    for (level, link) in chain.iter().take(MAX_REFERRAL_LEVELS).enumerate() {
        if link.whitelisted {
            recipients[level] = Some(link.account);
        }
    }
    recipients
}

/// Split a stablecoin payment's fee across the chain (6-decimal USD units).
pub fn split_payment(payment: U256, chain: &[ChainLink]) -> FeeSplit<U256> {
    let fee_total = payment * U256::from(FEE_PERCENT) / U256::from(100u64);

    let mut tiers = Vec::new();
    let mut paid = U256::zero();
    for (level, recipient) in resolve_tiers(chain).iter().enumerate() {
        if let Some(account) = recipient {
            let share = payment * U256::from(TIER_PERCENTS[level]) / U256::from(100u64);
            tiers.push((*account, share));
            paid += share;
        }
    }

    FeeSplit {
        tiers,
        platform: fee_total - paid,
        fee_total,
    }
}

/// Split a native payment's fee across the chain (motes).
pub fn split_payment_native(payment: U512, chain: &[ChainLink]) -> FeeSplit<U512> {
    let fee_total = payment * U512::from(FEE_PERCENT) / U512::from(100u64);

    let mut tiers = Vec::new();
    let mut paid = U512::zero();
    for (level, recipient) in resolve_tiers(chain).iter().enumerate() {
        if let Some(account) = recipient {
            let share = payment * U512::from(TIER_PERCENTS[level]) / U512::from(100u64);
            tiers.push((*account, share));
            paid += share;
        }
    }

    FeeSplit {
        tiers,
        platform: fee_total - paid,
        fee_total,
    }
}
