use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Account address as reported by the wallet provider (`0x`-prefixed hex).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    /// Shortened display form, e.g. `0x123...abcd`. Values too short to
    /// truncate, or with multi-byte characters at the cut points, are
    /// returned whole.
    pub fn short(&self) -> String {
        let raw = &self.0;
        let tail = raw.len().saturating_sub(4);
        if raw.len() <= 9 || !raw.is_char_boundary(5) || !raw.is_char_boundary(tail) {
            return raw.clone();
        }
        format!("{}...{}", &raw[..5], &raw[tail..])
    }
}

/// Chain id in the provider's hex notation, e.g. `0x1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainIdHex(pub String);

/// Which of the two candidate networks the build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetNetwork {
    Mainnet,
    Testnet,
}

/// Wallet session state. Owned by the session manager and mutated only
/// in response to provider events or explicit connect/disconnect calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub connected: bool,
    pub accounts: Vec<AccountAddress>,
    pub active_account: Option<AccountAddress>,
    pub chain_id: Option<ChainIdHex>,
}

/// One mint attempt. Constructed per attempt, discarded after submission.
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub quantity: u32,
    pub unit_price: U256,
}

impl MintRequest {
    /// Total transaction value, `unit_price × quantity`.
    pub fn total_cost(&self) -> Option<U256> {
        self.unit_price.checked_mul(U256::from(self.quantity))
    }
}

/// Cached on-chain sale state. Read on connect and after each successful
/// mint; may be stale between refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleState {
    pub total_supply: u64,
    pub max_supply: u64,
    pub is_presale: bool,
    pub is_paused: bool,
}

impl SaleState {
    /// Remaining mintable supply.
    pub fn headroom(&self) -> u64 {
        self.max_supply.saturating_sub(self.total_supply)
    }
}

/// Contract-defined minting phase, selected by the on-chain presale flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalePhase {
    Presale,
    Public,
}

/// Quantity limits. The ceiling always applies; configuring `max_supply`
/// switches on sale-state tracking and the headroom check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintLimits {
    pub ceiling: u32,
    pub max_supply: Option<u64>,
}

impl MintLimits {
    pub fn tracks_supply(&self) -> bool {
        self.max_supply.is_some()
    }
}

/// Build-time mint configuration.
#[derive(Debug, Clone)]
pub struct MintConfig {
    pub contract_address: Address,
    pub unit_price: U256,
    pub limits: MintLimits,
    pub target: TargetNetwork,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_address_truncates() {
        let addr = AccountAddress("0x1234567890abcdef1234567890abcdef12345678".to_owned());
        assert_eq!(addr.short(), "0x123...5678");
    }

    #[test]
    fn short_address_keeps_tiny_values() {
        let addr = AccountAddress("0x1234".to_owned());
        assert_eq!(addr.short(), "0x1234");
    }

    #[test]
    fn short_address_keeps_values_with_multibyte_cut_points() {
        let addr = AccountAddress("0x12é4567890é".to_owned());
        assert_eq!(addr.short(), addr.0);
    }

    #[test]
    fn total_cost_multiplies() {
        let request = MintRequest {
            quantity: 3,
            unit_price: U256::from(100_000_000_000_000u64),
        };
        assert_eq!(request.total_cost(), Some(U256::from(300_000_000_000_000u64)));
    }

    #[test]
    fn total_cost_checks_overflow() {
        let request = MintRequest {
            quantity: 2,
            unit_price: U256::MAX,
        };
        assert_eq!(request.total_cost(), None);
    }

    #[test]
    fn headroom_saturates() {
        let sale = SaleState {
            total_supply: 10_001,
            max_supply: 10_000,
            is_presale: false,
            is_paused: false,
        };
        assert_eq!(sale.headroom(), 0);
    }

    #[test]
    fn session_starts_empty() {
        let session = Session::default();
        assert!(!session.connected);
        assert!(session.accounts.is_empty());
        assert!(session.active_account.is_none());
        assert!(session.chain_id.is_none());
    }
}
