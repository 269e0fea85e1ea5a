//! CSPR-Sale Contracts
//!
//! Casper-native token sale round with referral fee splitting, linear
//! vesting, and a fee-on-transfer reflection sale token.
//!
//! ## Architecture
//!
//! - **SaleRound**: Multi-currency purchase orchestration, referral cascade,
//!   vesting release, admin operations
//! - **SaleToken**: Reflection token with three treasury pools and
//!   role-gated burn/withdrawals
//! - **vesting / referral / reflection**: Pure transition math behind both
//!   contracts
//! - **interfaces**: External collaborators (stablecoins, price adapter)
//!
//! ## Purchase Flow
//!
//! A buy quotes the payment to 6-decimal USD (stables 1:1, native via the
//! price adapter), deducts a 10% fee cascaded over up to three whitelisted
//! referral ancestors (5%/3%/2%, remainder to the platform pool), allocates
//! tokens at the configured USD price, releases the immediate fraction and
//! vests the rest linearly from the buyer's first purchase.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod interfaces;
pub mod vesting;
pub mod referral;
pub mod reflection;

// Contract modules
pub mod sale_round;
pub mod sale_token;
