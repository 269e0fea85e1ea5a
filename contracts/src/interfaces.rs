//! External collaborator interfaces consumed by the sale round.
//!
//! The stablecoins, the price adapter, and the sale token are separate
//! contracts; the round talks to them through `CallDef` calls shaped by
//! these traits.

use odra::prelude::*;
use odra::casper_types::{U256, U512};

/// CEP-18 token surface for cross-contract calls
#[odra::external_contract]
pub trait Cep18Token {
    fn transfer(&mut self, recipient: Address, amount: U256) -> bool;
    fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool;
    fn approve(&mut self, spender: Address, amount: U256) -> bool;
    fn allowance(&self, owner: Address, spender: Address) -> U256;
    fn balance_of(&self, account: Address) -> U256;
    fn total_supply(&self) -> U256;
}

/// Sale token surface the round drives beyond CEP-18: role-gated burn
#[odra::external_contract]
pub trait BurnableToken {
    fn burn(&mut self, from: Address, amount: U256);
}

/// Native-coin price adapter: quotes a motes amount as 6-decimal USD
#[odra::external_contract]
pub trait PriceAdapter {
    fn quote(&self, native_amount: U512) -> U256;
}
