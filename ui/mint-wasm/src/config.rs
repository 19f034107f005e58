//! Build-time configuration.
//!
//! All values come from `MINTPORT_*` environment variables read at
//! compile time, with defaults matching the reference deployment.

use alloy_primitives::{Address, U256};
use mp_types::{MintConfig, MintLimits, TargetNetwork};

const CONTRACT_ADDRESS: &str = match option_env!("MINTPORT_CONTRACT_ADDRESS") {
    Some(value) => value,
    None => "0x0000000000000000000000000000000000000000",
};

/// Price per token in wei (default 0.0001 ether).
const UNIT_PRICE_WEI: &str = match option_env!("MINTPORT_UNIT_PRICE_WEI") {
    Some(value) => value,
    None => "100000000000000",
};

/// Hard per-transaction quantity ceiling.
const MINT_CEILING: &str = match option_env!("MINTPORT_MINT_CEILING") {
    Some(value) => value,
    None => "3500",
};

/// When set, supply tracking is enabled and quantity is also checked
/// against headroom.
const MAX_SUPPLY: Option<&str> = option_env!("MINTPORT_MAX_SUPPLY");

const USE_MAINNET: bool = option_env!("MINTPORT_USE_MAINNET").is_some();

pub const METAMASK_INSTALL_URL: &str = "https://metamask.io/download/";
pub const METAMASK_DEEPLINK_BASE: &str = "https://metamask.app.link/dapp/";

pub fn mint_config() -> MintConfig {
    MintConfig {
        contract_address: CONTRACT_ADDRESS.parse().unwrap_or(Address::ZERO),
        unit_price: UNIT_PRICE_WEI
            .parse()
            .unwrap_or_else(|_| U256::from(100_000_000_000_000u64)),
        limits: MintLimits {
            ceiling: MINT_CEILING.parse().unwrap_or(3500),
            max_supply: MAX_SUPPLY.and_then(|value| value.parse().ok()),
        },
        target: if USE_MAINNET {
            TargetNetwork::Mainnet
        } else {
            TargetNetwork::Testnet
        },
    }
}
