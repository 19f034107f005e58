use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;
use thiserror::Error;

sol! {
    function totalSupply() external view returns (uint256);
    function presale() external view returns (bool);
    function paused() external view returns (bool);
    function mintPublicSale(uint256 quantity) external payable;
    function mintPreSale(uint256 quantity) external payable;
}

/// Technical prefix nodes attach to revert reasons.
pub const REVERT_PREFIX: &str = "execution reverted: ";

/// Strip the technical prefix from a revert message, leaving the
/// contract-supplied reason for display.
pub fn strip_revert_prefix(message: &str) -> &str {
    message.strip_prefix(REVERT_PREFIX).unwrap_or(message)
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    /// The call reverted or the user declined to sign. `reason` is
    /// display-ready (prefix already stripped).
    #[error("{reason}")]
    Reverted { reason: String },
    #[error("malformed return data: {0}")]
    Decode(String),
    #[error("{0}")]
    Transport(String),
}

/// Transaction hash as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHash(pub String);

/// Raw contract-call boundary. Implementations route calls through the
/// wallet provider, which signs state-changing submissions with the
/// active account.
#[async_trait(?Send)]
pub trait ContractCaller {
    /// Read-only call (`eth_call`).
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ContractError>;

    /// State-changing submission (`eth_sendTransaction`), payable.
    async fn send(&self, to: Address, data: Bytes, value: U256) -> Result<TxHash, ContractError>;

    /// Wait until the transaction is included and succeeded.
    async fn confirm(&self, tx: &TxHash) -> Result<(), ContractError>;
}

/// Typed binding to the deployed sale contract.
///
/// Exists only while the session is connected; the flow controller
/// creates and drops it on connection changes.
pub struct NftContract<C> {
    address: Address,
    caller: C,
}

impl<C: ContractCaller> NftContract<C> {
    pub fn new(address: Address, caller: C) -> Self {
        Self { address, caller }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn total_supply(&self) -> Result<u64, ContractError> {
        let data = totalSupplyCall {}.abi_encode();
        let raw = self.caller.call(self.address, data.into()).await?;
        let supply = totalSupplyCall::abi_decode_returns(&raw)
            .map_err(|err| ContractError::Decode(err.to_string()))?;
        u64::try_from(supply).map_err(|_| ContractError::Decode("totalSupply exceeds u64".to_owned()))
    }

    pub async fn presale(&self) -> Result<bool, ContractError> {
        let data = presaleCall {}.abi_encode();
        let raw = self.caller.call(self.address, data.into()).await?;
        presaleCall::abi_decode_returns(&raw).map_err(|err| ContractError::Decode(err.to_string()))
    }

    pub async fn paused(&self) -> Result<bool, ContractError> {
        let data = pausedCall {}.abi_encode();
        let raw = self.caller.call(self.address, data.into()).await?;
        pausedCall::abi_decode_returns(&raw).map_err(|err| ContractError::Decode(err.to_string()))
    }

    pub async fn mint_public_sale(&self, quantity: u32, value: U256) -> Result<TxHash, ContractError> {
        let data = mintPublicSaleCall {
            quantity: U256::from(quantity),
        }
        .abi_encode();
        self.caller.send(self.address, data.into(), value).await
    }

    pub async fn mint_pre_sale(&self, quantity: u32, value: U256) -> Result<TxHash, ContractError> {
        let data = mintPreSaleCall {
            quantity: U256::from(quantity),
        }
        .abi_encode();
        self.caller.send(self.address, data.into(), value).await
    }

    pub async fn confirm(&self, tx: &TxHash) -> Result<(), ContractError> {
        self.caller.confirm(tx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_sol_types::SolValue;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const CONTRACT: Address = address!("00000000000000000000000000000000000000a1");

    #[derive(Default)]
    struct MockCaller {
        /// selector → return data for reads
        reads: HashMap<[u8; 4], Vec<u8>>,
        sent: RefCell<Vec<(Address, Bytes, U256)>>,
        confirmed: RefCell<Vec<TxHash>>,
    }

    impl MockCaller {
        fn with_read(mut self, selector: [u8; 4], ret: Vec<u8>) -> Self {
            self.reads.insert(selector, ret);
            self
        }
    }

    #[async_trait(?Send)]
    impl ContractCaller for MockCaller {
        async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, ContractError> {
            let selector: [u8; 4] = data[..4].try_into().unwrap();
            match self.reads.get(&selector) {
                Some(ret) => Ok(ret.clone().into()),
                None => Err(ContractError::Transport("unexpected call".to_owned())),
            }
        }

        async fn send(&self, to: Address, data: Bytes, value: U256) -> Result<TxHash, ContractError> {
            self.sent.borrow_mut().push((to, data, value));
            Ok(TxHash("0xabc".to_owned()))
        }

        async fn confirm(&self, tx: &TxHash) -> Result<(), ContractError> {
            self.confirmed.borrow_mut().push(tx.clone());
            Ok(())
        }
    }

    #[test]
    fn revert_prefix_stripping() {
        assert_eq!(
            strip_revert_prefix("execution reverted: Sale not active"),
            "Sale not active"
        );
        assert_eq!(strip_revert_prefix("Sale not active"), "Sale not active");
    }

    #[test]
    fn total_supply_selector_is_canonical() {
        // keccak256("totalSupply()")[..4]
        assert_eq!(totalSupplyCall::SELECTOR, [0x18, 0x16, 0x0d, 0xdd]);
    }

    #[tokio::test]
    async fn reads_decode_contract_values() {
        let caller = MockCaller::default()
            .with_read(totalSupplyCall::SELECTOR, U256::from(9997u64).abi_encode())
            .with_read(presaleCall::SELECTOR, true.abi_encode())
            .with_read(pausedCall::SELECTOR, false.abi_encode());
        let contract = NftContract::new(CONTRACT, caller);

        assert_eq!(contract.total_supply().await.unwrap(), 9997);
        assert!(contract.presale().await.unwrap());
        assert!(!contract.paused().await.unwrap());
    }

    #[tokio::test]
    async fn mint_encodes_quantity_and_value() {
        let contract = NftContract::new(CONTRACT, MockCaller::default());
        let value = U256::from(500_000_000_000_000u64);

        let tx = contract.mint_public_sale(5, value).await.unwrap();
        assert_eq!(tx, TxHash("0xabc".to_owned()));

        let sent = contract.caller.sent.borrow();
        assert_eq!(sent.len(), 1);
        let (to, data, sent_value) = &sent[0];
        assert_eq!(*to, CONTRACT);
        assert_eq!(*sent_value, value);
        assert_eq!(&data[..4], mintPublicSaleCall::SELECTOR.as_slice());
        let decoded = mintPublicSaleCall::abi_decode(data).unwrap();
        assert_eq!(decoded.quantity, U256::from(5u64));
    }

    #[tokio::test]
    async fn presale_entry_point_uses_distinct_selector() {
        let contract = NftContract::new(CONTRACT, MockCaller::default());
        contract.mint_pre_sale(1, U256::ZERO).await.unwrap();

        let sent = contract.caller.sent.borrow();
        assert_eq!(&sent[0].1[..4], mintPreSaleCall::SELECTOR.as_slice());
        assert_ne!(mintPreSaleCall::SELECTOR, mintPublicSaleCall::SELECTOR);
    }
}
