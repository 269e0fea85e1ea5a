//! Sale Token Contract
//!
//! CEP-18 compatible reflection token. Every transfer between non-exempt
//! endpoints pays a fee split into three treasury pools (buyback, community
//! reward, provide liquidity) and a reflect share that is redistributed to
//! all included holders through the global rate (see `reflection`).
//!
//! - Included accounts hold rate-scaled reflection balances and passively
//!   appreciate on every fee event.
//! - Excluded accounts hold plain token balances and do not.
//! - Pool shares accumulate on the contract's own balance, mirrored by
//!   token-unit pool ledgers that DAO-role holders can drain.
//! - A burner role (granted to the sale round) can burn unsold supply.

use odra::prelude::*;
use odra::casper_types::U256;

use crate::errors::SaleError;
use crate::reflection::{ReflectionTotals, TransferPlan};

/// Role constants (u8 for efficient storage)
pub const ROLE_DAO: u8 = 0;
pub const ROLE_BURNER: u8 = 1;

/// Sale Token Contract
#[odra::module]
pub struct SaleToken {
    /// Token name
    name: Var<String>,
    /// Token symbol
    symbol: Var<String>,
    /// Decimals (18)
    decimals: Var<u8>,
    /// Global reflection-rate state
    totals: Var<ReflectionTotals>,
    /// Transfer fee percent (0-100)
    fee_percent: Var<u32>,
    /// Reflection-unit balances of included accounts
    reflected_balances: Mapping<Address, U256>,
    /// Token-unit balances of excluded accounts
    token_balances: Mapping<Address, U256>,
    /// Accounts excluded from reflection
    excluded: Mapping<Address, bool>,
    /// Endpoints whose transfers move at face value
    fee_exempt: Mapping<Address, bool>,
    /// Allowance mapping (owner -> spender -> amount)
    allowances: Mapping<(Address, Address), U256>,
    /// Buyback pool ledger (token units)
    buyback_pool: Var<U256>,
    /// Community reward pool ledger (token units)
    community_reward_pool: Var<U256>,
    /// Provide-liquidity pool ledger (token units)
    provide_liquidity_pool: Var<U256>,
    /// Contract owner
    owner: Var<Address>,
    /// Role assignments: (role, account) -> bool
    roles: Mapping<(u8, Address), bool>,
    /// Whether pool withdrawals ride the fee-bearing transfer path
    pool_withdraw_taxed: Var<bool>,
}

#[odra::module]
impl SaleToken {
    /// Initialize the token; the deployer owns the entire supply.
    pub fn init(&mut self, fee_percent: u32, total_supply: U256) {
        if fee_percent >= 100 || total_supply.is_zero() {
            self.env().revert(SaleError::InvalidConfig);
        }

        let deployer = self.env().caller();
        let totals = ReflectionTotals::new(total_supply);

        self.name.set(String::from("Sale Token"));
        self.symbol.set(String::from("SALE"));
        self.decimals.set(18);
        self.fee_percent.set(fee_percent);
        self.reflected_balances.set(&deployer, totals.reflection_total);
        self.totals.set(totals);
        self.buyback_pool.set(U256::zero());
        self.community_reward_pool.set(U256::zero());
        self.provide_liquidity_pool.set(U256::zero());
        self.owner.set(deployer);
        self.pool_withdraw_taxed.set(false);
    }

    // ========== CEP-18 Standard Functions ==========

    /// Get token name
    pub fn name(&self) -> String {
        self.name.get().unwrap_or_else(|| String::from("Sale Token"))
    }

    /// Get token symbol
    pub fn symbol(&self) -> String {
        self.symbol.get().unwrap_or_else(|| String::from("SALE"))
    }

    /// Get decimals
    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(18)
    }

    /// Get total supply
    pub fn total_supply(&self) -> U256 {
        self.current_totals().token_total
    }

    /// Get balance of an account, in token units for both representations
    pub fn balance_of(&self, account: Address) -> U256 {
        if self.is_excluded(account) {
            return self.token_balances.get(&account).unwrap_or(U256::zero());
        }

        let rate = self.current_totals().rate();
        if rate.is_zero() {
            return U256::zero();
        }
        self.reflected_balances.get(&account).unwrap_or(U256::zero()) / rate
    }

    /// Get allowance for spender
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or(U256::zero())
    }

    /// Transfer tokens to recipient through the fee-aware path
    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        let exempt = self.endpoints_exempt(sender, recipient);
        self.execute_transfer(sender, recipient, amount, exempt);
        true
    }

    /// Approve spender to spend tokens
    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.allowances.set(&(owner, spender), amount);
        true
    }

    /// Transfer tokens from owner to recipient (requires allowance)
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();

        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            self.env().revert(SaleError::InsufficientAllowance);
        }

        let exempt = self.endpoints_exempt(owner, recipient);
        self.execute_transfer(owner, recipient, amount, exempt);
        self.allowances.set(&(owner, spender), current_allowance - amount);
        true
    }

    // ========== Reflection Management (Owner) ==========

    /// Snapshot an account's balance into token units and stop reflecting it
    pub fn exclude_account(&mut self, account: Address) {
        self.require_owner();

        if self.is_excluded(account) {
            self.env().revert(SaleError::AccountAlreadyExcluded);
        }

        let rate = self.current_totals().rate();
        let reflected = self.reflected_balances.get(&account).unwrap_or(U256::zero());
        let snapshot = if rate.is_zero() { U256::zero() } else { reflected / rate };

        self.excluded.set(&account, true);
        self.token_balances.set(&account, snapshot);
        self.reflected_balances.set(&account, U256::zero());
    }

    /// Convert an excluded account back to a reflection balance
    pub fn include_account(&mut self, account: Address) {
        self.require_owner();

        if !self.is_excluded(account) {
            self.env().revert(SaleError::AccountNotExcluded);
        }

        let rate = self.current_totals().rate();
        let snapshot = self.token_balances.get(&account).unwrap_or(U256::zero());

        self.excluded.set(&account, false);
        self.token_balances.set(&account, U256::zero());
        self.reflected_balances.set(&account, snapshot * rate);
    }

    /// Mark an endpoint whose transfers move at face value
    pub fn set_fee_exempt(&mut self, account: Address, exempt: bool) {
        self.require_owner();
        self.fee_exempt.set(&account, exempt);
    }

    /// Route pool withdrawals through the fee-bearing path (or not)
    pub fn set_pool_withdraw_taxed(&mut self, taxed: bool) {
        self.require_owner();
        self.pool_withdraw_taxed.set(taxed);
    }

    // ========== Role Management (Owner) ==========

    /// Grant a role to an account
    pub fn grant_role(&mut self, role_id: u8, account: Address) {
        self.require_owner();
        self.roles.set(&(role_id, account), true);
    }

    /// Revoke a role from an account
    pub fn revoke_role(&mut self, role_id: u8, account: Address) {
        self.require_owner();
        self.roles.set(&(role_id, account), false);
    }

    /// Check if account has a role
    pub fn has_role(&self, role_id: u8, account: Address) -> bool {
        self.roles.get(&(role_id, account)).unwrap_or(false)
    }

    // ========== Burn (Burner Role) ==========

    /// Burn tokens from a holder, shrinking both totals proportionally so
    /// every other holder's balance is unchanged.
    pub fn burn(&mut self, from: Address, amount: U256) {
        self.require_role(ROLE_BURNER);

        let mut totals = self.current_totals();
        let rate = totals.rate();

        self.debit(from, amount, rate);
        totals.burn(amount, rate);
        self.totals.set(totals);
    }

    // ========== Pool Withdrawals (DAO Role) ==========

    /// Drain the buyback pool to `to`
    pub fn withdraw_buyback(&mut self, to: Address) {
        self.require_role(ROLE_DAO);
        let amount = self.buyback_pool.get().unwrap_or(U256::zero());
        self.buyback_pool.set(U256::zero());
        self.payout_pool(to, amount);
    }

    /// Drain the community reward pool to `to`
    pub fn withdraw_community_reward_pool(&mut self, to: Address) {
        self.require_role(ROLE_DAO);
        let amount = self.community_reward_pool.get().unwrap_or(U256::zero());
        self.community_reward_pool.set(U256::zero());
        self.payout_pool(to, amount);
    }

    /// Drain the provide-liquidity pool to `to`
    pub fn withdraw_provide_liquidity(&mut self, to: Address) {
        self.require_role(ROLE_DAO);
        let amount = self.provide_liquidity_pool.get().unwrap_or(U256::zero());
        self.provide_liquidity_pool.set(U256::zero());
        self.payout_pool(to, amount);
    }

    /// Pay out the contract's residue (reflection gains beyond the pool
    /// ledgers) through the standard fee-bearing path. Owner only.
    pub fn withdraw_distribute(&mut self, to: Address) {
        self.require_owner();

        let contract = self.env().self_address();
        let pools = self.buyback_pool.get().unwrap_or(U256::zero())
            + self.community_reward_pool.get().unwrap_or(U256::zero())
            + self.provide_liquidity_pool.get().unwrap_or(U256::zero());
        let residue = self.balance_of(contract).saturating_sub(pools);

        if residue.is_zero() {
            self.env().revert(SaleError::ZeroAmount);
        }

        let exempt = self.endpoints_exempt(contract, to);
        self.execute_transfer(contract, to, residue, exempt);
    }

    // ========== View Functions ==========

    /// Get the buyback pool balance
    pub fn get_buyback(&self) -> U256 {
        self.buyback_pool.get().unwrap_or(U256::zero())
    }

    /// Get the community reward pool balance
    pub fn get_community_reward_pool(&self) -> U256 {
        self.community_reward_pool.get().unwrap_or(U256::zero())
    }

    /// Get the provide-liquidity pool balance
    pub fn get_provide_liquidity(&self) -> U256 {
        self.provide_liquidity_pool.get().unwrap_or(U256::zero())
    }

    /// Get the transfer fee percent
    pub fn get_fee_percent(&self) -> u32 {
        self.fee_percent.get().unwrap_or(0)
    }

    /// Get the contract owner
    pub fn get_owner(&self) -> Option<Address> {
        self.owner.get()
    }

    /// Check if an account is excluded from reflection
    pub fn is_excluded(&self, account: Address) -> bool {
        self.excluded.get(&account).unwrap_or(false)
    }

    /// Check if an endpoint is fee-exempt
    pub fn is_fee_exempt(&self, account: Address) -> bool {
        self.fee_exempt.get(&account).unwrap_or(false)
    }

    /// Whether pool withdrawals ride the fee-bearing path
    pub fn get_pool_withdraw_taxed(&self) -> bool {
        self.pool_withdraw_taxed.get().unwrap_or(false)
    }

    // ========== Internal Functions ==========

    fn current_totals(&self) -> ReflectionTotals {
        self.totals.get().unwrap_or(ReflectionTotals {
            reflection_total: U256::zero(),
            token_total: U256::zero(),
        })
    }

    fn endpoints_exempt(&self, from: Address, to: Address) -> bool {
        self.is_fee_exempt(from) || self.is_fee_exempt(to)
    }

    /// Move `amount` from `from` to `to`, applying the fee model unless
    /// `fee_exempt`. The rate is read once; every conversion in this
    /// transfer uses it.
    fn execute_transfer(&mut self, from: Address, to: Address, amount: U256, fee_exempt: bool) {
        let mut totals = self.current_totals();
        let rate = totals.rate();
        let plan = TransferPlan::plan(amount, self.get_fee_percent(), fee_exempt);

        self.debit(from, amount, rate);
        self.credit(to, plan.net, rate);

        if !plan.fee.is_zero() {
            let fee = plan.fee;
            self.buyback_pool.set(self.get_buyback() + fee.buyback);
            self.community_reward_pool
                .set(self.get_community_reward_pool() + fee.community_reward);
            self.provide_liquidity_pool
                .set(self.get_provide_liquidity() + fee.provide_liquidity);

            // Pool shares live on the contract's own balance
            let contract = self.env().self_address();
            self.credit(contract, fee.pools_total(), rate);

            totals.shrink(fee.reflect, rate);
            self.totals.set(totals);
        }
    }

    fn debit(&mut self, account: Address, amount: U256, rate: U256) {
        if self.is_excluded(account) {
            let balance = self.token_balances.get(&account).unwrap_or(U256::zero());
            if balance < amount {
                self.env().revert(SaleError::InsufficientBalance);
            }
            self.token_balances.set(&account, balance - amount);
        } else {
            let reflected = self.reflected_balances.get(&account).unwrap_or(U256::zero());
            // Token-unit comparison first keeps amount * rate within the
            // documented overflow bound.
            if rate.is_zero() || reflected / rate < amount {
                self.env().revert(SaleError::InsufficientBalance);
            }
            self.reflected_balances.set(&account, reflected - amount * rate);
        }
    }

    fn credit(&mut self, account: Address, amount: U256, rate: U256) {
        if self.is_excluded(account) {
            let balance = self.token_balances.get(&account).unwrap_or(U256::zero());
            self.token_balances.set(&account, balance + amount);
        } else {
            let reflected = self.reflected_balances.get(&account).unwrap_or(U256::zero());
            self.reflected_balances.set(&account, reflected + amount * rate);
        }
    }

    fn payout_pool(&mut self, to: Address, amount: U256) {
        if amount.is_zero() {
            return;
        }

        let contract = self.env().self_address();
        let exempt = !self.get_pool_withdraw_taxed() || self.endpoints_exempt(contract, to);
        self.execute_transfer(contract, to, amount, exempt);
    }

    fn require_owner(&self) {
        let caller = self.env().caller();
        match self.owner.get() {
            Some(owner) if caller == owner => {}
            _ => self.env().revert(SaleError::Unauthorized),
        }
    }

    fn require_role(&self, role_id: u8) {
        if !self.has_role(role_id, self.env().caller()) {
            self.env().revert(SaleError::MissingRole);
        }
    }
}
