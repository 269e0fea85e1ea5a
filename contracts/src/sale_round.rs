//! Sale Round Contract
//!
//! Orchestrates the token sale:
//! - Accepts two 6-decimal stablecoins at 1:1 USD and the native coin quoted
//!   through an external price adapter
//! - Takes a 10% fee per purchase, cascaded across up to three whitelisted
//!   referral ancestors (5% / 3% / 2%), remainder to the platform pool
//! - Releases an immediate fraction of every allocation and vests the rest
//!   linearly (see `vesting`)
//! - Holds a pre-funded sale token balance and burns whatever stays unsold
//!
//! Every entry point is validate-then-commit: all preconditions are checked
//! and all ledger state is written before any external transfer, so a
//! re-entering transfer target can never observe stale claim or sold state.

use odra::prelude::*;
use odra::casper_types::{runtime_args, U256, U512};
use odra::CallDef;

use crate::errors::SaleError;
use crate::referral::{self, ChainLink};
use crate::types::{CollectedFunds, Contribution, SaleConfig, SaleInfo};
use crate::vesting;

/// Sale token fractional unit (18 decimals)
const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Tokens bought by a 6-decimal USD value at a 6-decimal USD price.
pub fn tokens_for_usd(usd_after_fee: U256, token_price_usd: U256) -> U256 {
    usd_after_fee * U256::from(TOKEN_UNIT) / token_price_usd
}

/// Ledger outcome of a committed purchase, before external transfers.
struct PurchaseOutcome {
    /// Sale tokens to release to the buyer right away
    immediate: U256,
    /// The buyer's referral chain with whitelist flags at purchase time
    chain: Vec<ChainLink>,
}

/// Sale Round Contract
#[odra::module]
pub struct SaleRound {
    /// Immutable sale configuration
    config: Var<SaleConfig>,
    /// Per-buyer purchase and claim state
    contributions: Mapping<Address, Contribution>,
    /// Referral graph: buyer -> referrer, set at most once
    referrer_of: Mapping<Address, Address>,
    /// Referral-fee eligibility
    whitelist: Mapping<Address, bool>,
    /// Sale tokens allocated so far
    total_sold: Var<U256>,
    /// Unsold tokens already burned
    burned_unsold: Var<U256>,
    /// Native coin collected, in motes
    collected_native: Var<U512>,
    /// Stablecoin A collected (6-decimal USD)
    collected_stable_a: Var<U256>,
    /// Stablecoin B collected (6-decimal USD)
    collected_stable_b: Var<U256>,
    /// Platform fee pool, stable-denominated (6-decimal USD)
    platform_fee_usd: Var<U256>,
    /// Platform fee pool, native (motes)
    platform_fee_native: Var<U512>,
}

#[odra::module]
impl SaleRound {
    /// Initialize the round. Parameter order is part of the ABI.
    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        total_reward: U256,
        sale_token: Address,
        vesting_months: u32,
        percent_immediate: u32,
        token_price_usd: U256,
        stable_a: Address,
        stable_b: Address,
        price_adapter: Address,
        max_contribution: U256,
        min_contribution: U256,
        platform_owner: Address,
    ) {
        if total_reward.is_zero()
            || token_price_usd.is_zero()
            || percent_immediate > 100
            || min_contribution > max_contribution
        {
            self.env().revert(SaleError::InvalidConfig);
        }

        self.config.set(SaleConfig {
            total_reward,
            sale_token,
            vesting_months,
            percent_immediate,
            token_price_usd,
            stable_a,
            stable_b,
            price_adapter,
            max_contribution,
            min_contribution,
            platform_owner,
        });
        self.total_sold.set(U256::zero());
        self.burned_unsold.set(U256::zero());
        self.collected_native.set(U512::zero());
        self.collected_stable_a.set(U256::zero());
        self.collected_stable_b.set(U256::zero());
        self.platform_fee_usd.set(U256::zero());
        self.platform_fee_native.set(U512::zero());
    }

    // ========== Purchase Entry Points ==========

    /// Buy sale tokens with an accepted stablecoin.
    ///
    /// Requires a prior `approve` of `amount` for this contract.
    pub fn buy(&mut self, currency: Address, amount: U256, referrer: Option<Address>) {
        let config = self.sale_config();
        if currency != config.stable_a && currency != config.stable_b {
            self.env().revert(SaleError::InvalidCurrency);
        }
        if amount.is_zero() {
            self.env().revert(SaleError::ZeroAmount);
        }

        let buyer = self.env().caller();
        // Stablecoins are 6-decimal and 1:1 USD
        let usd_value = amount;

        // Commit every ledger mutation first
        let purchase = self.commit_purchase(buyer, usd_value, &config, referrer);
        let split = referral::split_payment(amount, &purchase.chain);
        self.platform_fee_usd.set(self.get_fee_contract() + split.platform);
        if currency == config.stable_a {
            let collected = self.collected_stable_a.get().unwrap_or(U256::zero());
            self.collected_stable_a.set(collected + amount);
        } else {
            let collected = self.collected_stable_b.get().unwrap_or(U256::zero());
            self.collected_stable_b.set(collected + amount);
        }

        // External transfers last: pull the payment, push the tier shares,
        // release the immediate fraction
        let contract = self.env().self_address();
        self.token_transfer_from(currency, buyer, contract, amount);
        for (account, share) in &split.tiers {
            self.token_transfer(currency, *account, *share);
        }
        if !purchase.immediate.is_zero() {
            self.token_transfer(config.sale_token, buyer, purchase.immediate);
        }
    }

    /// Buy sale tokens with the attached native value, quoted to USD
    /// through the price adapter.
    #[odra(payable)]
    pub fn buy_native(&mut self, referrer: Option<Address>) {
        let config = self.sale_config();
        let attached = self.env().attached_value();
        if attached.is_zero() {
            self.env().revert(SaleError::ZeroAmount);
        }

        let buyer = self.env().caller();
        let usd_value = self.quote_native(config.price_adapter, attached);

        let purchase = self.commit_purchase(buyer, usd_value, &config, referrer);
        let split = referral::split_payment_native(attached, &purchase.chain);
        self.platform_fee_native.set(self.get_fee_native() + split.platform);
        let collected = self.collected_native.get().unwrap_or(U512::zero());
        self.collected_native.set(collected + attached);

        // The payment itself is already attached to the call; only the tier
        // shares and the immediate release leave the contract
        for (account, share) in &split.tiers {
            self.env().transfer_tokens(account, share);
        }
        if !purchase.immediate.is_zero() {
            self.token_transfer(config.sale_token, buyer, purchase.immediate);
        }
    }

    /// Claim every vested, not yet released token.
    pub fn claim(&mut self) {
        let config = self.sale_config();
        let caller = self.env().caller();

        let mut contribution = self.contributions.get(&caller).unwrap_or_default();
        let available = vesting::claimable(
            &contribution,
            config.percent_immediate,
            config.vesting_months,
            self.now_seconds(),
        );
        if available.is_zero() {
            self.env().revert(SaleError::ZeroAmount);
        }

        // Committed before the external transfer
        contribution.amount_claimed += available;
        self.contributions.set(&caller, contribution);

        self.token_transfer(config.sale_token, caller, available);
    }

    // ========== Admin Functions (Owner) ==========

    /// Admit an address to the referral whitelist
    pub fn add_to_white_list(&mut self, account: Address) {
        self.require_owner();
        self.whitelist.set(&account, true);
    }

    /// Withdraw native coin to the platform owner
    pub fn withdraw(&mut self, amount: U512) {
        self.require_owner();
        if amount > self.env().self_balance() {
            self.env().revert(SaleError::InsufficientBalance);
        }
        let owner = self.sale_config().platform_owner;
        self.env().transfer_tokens(&owner, &amount);
    }

    /// Rescue an arbitrary held token to the platform owner
    pub fn withdraw_token(&mut self, token: Address, amount: U256) {
        self.require_owner();
        let owner = self.sale_config().platform_owner;
        self.token_transfer(token, owner, amount);
    }

    /// Burn the unsold part of the pre-funded allocation.
    ///
    /// Requires the burner role on the sale token. A repeat call finds
    /// nothing left and burns zero instead of reverting.
    pub fn burn_unsold_token(&mut self) {
        self.require_owner();
        let config = self.sale_config();

        let sold = self.get_total_sold();
        let burned = self.burned_unsold.get().unwrap_or(U256::zero());
        let unsold = config.total_reward.saturating_sub(sold + burned);
        if unsold.is_zero() {
            return;
        }

        self.burned_unsold.set(burned + unsold);

        let args = runtime_args! {
            "from" => self.env().self_address(),
            "amount" => unsold
        };
        self.env()
            .call_contract::<()>(config.sale_token, CallDef::new("burn", true, args));
    }

    // ========== View Functions ==========

    /// Get the round parameters and progress
    pub fn get_info(&self) -> SaleInfo {
        let config = self.sale_config();
        SaleInfo {
            sale_token: config.sale_token,
            total_reward: config.total_reward,
            percent_immediate: config.percent_immediate,
            total_sold: self.get_total_sold(),
            vesting_months: config.vesting_months,
            max_contribution: config.max_contribution,
            min_contribution: config.min_contribution,
            token_price_usd: config.token_price_usd,
        }
    }

    /// Get collected funds per currency class
    pub fn get_info_tokens(&self) -> CollectedFunds {
        CollectedFunds {
            native: self.collected_native.get().unwrap_or(U512::zero()),
            usd: self.collected_stable_a.get().unwrap_or(U256::zero())
                + self.collected_stable_b.get().unwrap_or(U256::zero()),
        }
    }

    /// Quote a native amount as 6-decimal USD through the price adapter
    pub fn get_price(&self, native_amount: U512) -> U256 {
        let adapter = self.sale_config().price_adapter;
        self.quote_native(adapter, native_amount)
    }

    /// Whether a payment asset is accepted
    pub fn get_currency_status(&self, currency: Address) -> bool {
        let config = self.sale_config();
        currency == config.stable_a || currency == config.stable_b
    }

    /// Stable-denominated platform fee pool (6-decimal USD)
    pub fn get_fee_contract(&self) -> U256 {
        self.platform_fee_usd.get().unwrap_or(U256::zero())
    }

    /// Native platform fee pool (motes)
    pub fn get_fee_native(&self) -> U512 {
        self.platform_fee_native.get().unwrap_or(U512::zero())
    }

    /// Native balance held by the contract
    pub fn get_balance_contract(&self) -> U512 {
        self.env().self_balance()
    }

    /// Amount a buyer could claim right now
    pub fn get_available_amount(&self, account: Address) -> U256 {
        let config = self.sale_config();
        let contribution = self.contributions.get(&account).unwrap_or_default();
        vesting::claimable(
            &contribution,
            config.percent_immediate,
            config.vesting_months,
            self.now_seconds(),
        )
    }

    /// Get a buyer's contribution record
    pub fn get_contribution(&self, account: Address) -> Contribution {
        self.contributions.get(&account).unwrap_or_default()
    }

    /// Get a buyer's registered referrer, if any
    pub fn get_referrer(&self, account: Address) -> Option<Address> {
        self.referrer_of.get(&account)
    }

    /// Whether an address can earn referral fees
    pub fn is_whitelisted(&self, account: Address) -> bool {
        self.whitelist.get(&account).unwrap_or(false)
    }

    /// Tokens allocated so far
    pub fn get_total_sold(&self) -> U256 {
        self.total_sold.get().unwrap_or(U256::zero())
    }

    // ========== Internal Functions ==========

    /// Validate a purchase and commit every ledger mutation.
    ///
    /// Runs entirely before any external transfer; reverts leave no state
    /// behind.
    fn commit_purchase(
        &mut self,
        buyer: Address,
        usd_value: U256,
        config: &SaleConfig,
        referrer: Option<Address>,
    ) -> PurchaseOutcome {
        if usd_value.is_zero() {
            self.env().revert(SaleError::ZeroAmount);
        }
        if usd_value < config.min_contribution || usd_value > config.max_contribution {
            self.env().revert(SaleError::MinMaxContribution);
        }

        let fee_usd = usd_value * U256::from(referral::FEE_PERCENT) / U256::from(100u64);
        let tokens = tokens_for_usd(usd_value - fee_usd, config.token_price_usd);
        if tokens.is_zero() {
            self.env().revert(SaleError::ZeroAmount);
        }

        let sold = self.get_total_sold();
        if sold + tokens > config.total_reward {
            self.env().revert(SaleError::ExceedingMaxSold);
        }

        // Register the referral link first so this purchase's fee already
        // walks it; set once, never to self
        if let Some(referrer) = referrer {
            if referrer != buyer && self.referrer_of.get(&buyer).is_none() {
                self.referrer_of.set(&buyer, referrer);
            }
        }
        let chain = self.referral_chain(buyer);

        let mut contribution = self.contributions.get(&buyer).unwrap_or_default();
        if contribution.total_purchased.is_zero() {
            contribution.first_purchase_time = self.now_seconds();
        }
        let immediate = tokens * U256::from(config.percent_immediate) / U256::from(100u64);
        contribution.total_purchased += tokens;
        contribution.amount_claimed += immediate;
        self.contributions.set(&buyer, contribution);
        self.total_sold.set(sold + tokens);

        if usd_value >= U256::from(referral::WHITELIST_THRESHOLD_USD) {
            self.whitelist.set(&buyer, true);
        }

        PurchaseOutcome { immediate, chain }
    }

    /// Walk the referral graph up to three ancestors, with whitelist flags
    fn referral_chain(&self, buyer: Address) -> Vec<ChainLink> {
        let mut chain = Vec::new();
        let mut cursor = buyer;
        for _ in 0..referral::MAX_REFERRAL_LEVELS {
            match self.referrer_of.get(&cursor) {
                Some(ancestor) => {
                    chain.push(ChainLink {
                        account: ancestor,
                        whitelisted: self.is_whitelisted(ancestor),
                    });
                    cursor = ancestor;
                }
                None => break,
            }
        }
        chain
    }

    fn quote_native(&self, adapter: Address, amount: U512) -> U256 {
        let args = runtime_args! {
            "native_amount" => amount
        };
        self.env()
            .call_contract::<U256>(adapter, CallDef::new("quote", false, args))
    }

    fn token_transfer(&self, token: Address, recipient: Address, amount: U256) {
        let args = runtime_args! {
            "recipient" => recipient,
            "amount" => amount
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer", true, args));
    }

    fn token_transfer_from(&self, token: Address, owner: Address, recipient: Address, amount: U256) {
        let args = runtime_args! {
            "owner" => owner,
            "recipient" => recipient,
            "amount" => amount
        };
        self.env()
            .call_contract::<bool>(token, CallDef::new("transfer_from", true, args));
    }

    /// Casper block time is milliseconds; the ledger keeps seconds
    fn now_seconds(&self) -> u64 {
        self.env().get_block_time() / 1000
    }

    fn sale_config(&self) -> SaleConfig {
        self.config.get().unwrap_or_default()
    }

    fn require_owner(&self) {
        if self.env().caller() != self.sale_config().platform_owner {
            self.env().revert(SaleError::Unauthorized);
        }
    }
}
