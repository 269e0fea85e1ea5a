//! Deploy the sale contracts to Casper livenet/testnet using the Odra
//! livenet environment.
//!
//! Usage:
//!   cargo run --bin deploy_livenet --release
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=200000000000
//!   SALE_STABLE_A=hash-...
//!   SALE_STABLE_B=hash-...
//!   SALE_PRICE_ADAPTER=hash-...

use odra::casper_types::U256;
use odra::host::Deployer;
use odra::prelude::*;

use cspr_sale_contracts::sale_round::{SaleRound, SaleRoundInitArgs};
use cspr_sale_contracts::sale_token::{SaleToken, SaleTokenInitArgs, ROLE_BURNER};

fn env_address(var: &str) -> Address {
    let raw = std::env::var(var).unwrap_or_else(|_| panic!("{var} not set"));
    Address::from_str(&raw).unwrap_or_else(|_| panic!("{var} is not a valid address"))
}

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();

    println!("=== CSPR-Sale Livenet Deployment ===");
    println!();

    // Initialize Odra livenet environment
    let env = odra_casper_livenet_env::env();

    // Configure payment amount for deployments/calls (required for Casper 2.0 txs)
    let payment_amount: u64 = std::env::var("ODRA_CASPER_LIVENET_PAYMENT_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(200_000_000_000);
    env.set_gas(payment_amount);

    // Get deployer address
    let deployer = env.caller();
    println!("Deployer: {:?}", deployer);
    println!();

    // External collaborators
    let stable_a = env_address("SALE_STABLE_A");
    let stable_b = env_address("SALE_STABLE_B");
    let price_adapter = env_address("SALE_PRICE_ADAPTER");

    // Sale parameters
    let token_unit = U256::from(10u64).pow(U256::from(18u64));
    let total_supply = U256::from(500_000_000u64) * token_unit; // 500M SALE
    let total_reward = U256::from(10_000u64) * token_unit; // round allocation
    let fee_percent: u32 = 2; // token transfer fee
    let vesting_months: u32 = 12;
    let percent_immediate: u32 = 5;
    let token_price_usd = U256::from(70_000u64); // 0.07 USD, 6 decimals
    let max_contribution = U256::from(100_000_000u64); // 100 USD
    let min_contribution = U256::zero();

    // ==================== Phase 1: Contracts ====================
    println!("=== Phase 1: Deploying Contracts ===");
    println!();

    println!("Deploying SaleToken...");
    let mut sale_token = SaleToken::deploy(
        &env,
        SaleTokenInitArgs {
            fee_percent,
            total_supply,
        },
    );
    let sale_token_addr = sale_token.address().clone();
    println!("SaleToken deployed at: {:?}", sale_token_addr);

    println!("Deploying SaleRound...");
    let sale_round = SaleRound::deploy(
        &env,
        SaleRoundInitArgs {
            total_reward,
            sale_token: sale_token_addr,
            vesting_months,
            percent_immediate,
            token_price_usd,
            stable_a,
            stable_b,
            price_adapter,
            max_contribution,
            min_contribution,
            platform_owner: deployer,
        },
    );
    let sale_round_addr = sale_round.address().clone();
    println!("SaleRound deployed at: {:?}", sale_round_addr);

    println!();

    // ==================== Phase 2: Wiring ====================
    println!("=== Phase 2: Cross-contract Configuration ===");
    println!();

    // The round burns unsold allocation through the token's burner role
    println!("Granting burner role to SaleRound...");
    sale_token.grant_role(ROLE_BURNER, sale_round_addr);
    println!("Done.");

    // Sale distributions move at face value
    println!("Fee-exempting SaleRound...");
    sale_token.set_fee_exempt(sale_round_addr, true);
    println!("Done.");

    // Pre-fund the round with the sellable allocation
    println!("Funding SaleRound with the round allocation...");
    sale_token.transfer(sale_round_addr, total_reward);
    println!("Done.");

    println!();
    println!("=== Deployment Complete ===");
    println!();
    println!("Contract Addresses:");
    println!("  SaleToken: {:?}", sale_token_addr);
    println!("  SaleRound: {:?}", sale_round_addr);
}
