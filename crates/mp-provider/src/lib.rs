use async_trait::async_trait;
use mp_types::{AccountAddress, ChainIdHex, TargetNetwork};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// EIP-1193 error code for a request the user declined.
pub const CODE_USER_REJECTED: i64 = 4001;
/// EIP-1193 error code for a chain the wallet does not know about.
pub const CODE_UNKNOWN_CHAIN: i64 = 4902;

/// A chain the wallet can be asked to switch to or add.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: ChainIdHex,
    pub rpc_url: String,
}

pub fn ethereum_mainnet() -> NetworkConfig {
    NetworkConfig {
        chain_id: ChainIdHex("0x1".to_owned()),
        rpc_url: "https://main-light.eth.linkpool.io/".to_owned(),
    }
}

pub fn ethereum_rinkeby() -> NetworkConfig {
    NetworkConfig {
        chain_id: ChainIdHex("0x4".to_owned()),
        rpc_url: "https://rinkeby-light.eth.linkpool.io/".to_owned(),
    }
}

/// The network a build targets, resolved to its full descriptor.
pub fn network_for(target: TargetNetwork) -> NetworkConfig {
    match target {
        TargetNetwork::Mainnet => ethereum_mainnet(),
        TargetNetwork::Testnet => ethereum_rinkeby(),
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("user rejected the request")]
    UserRejected,
    #[error("chain not recognized by the wallet")]
    UnknownChain,
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("{0}")]
    Transport(String),
}

impl ProviderError {
    /// Map a raw EIP-1193 error into the typed kinds the flow cares about.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        match code {
            CODE_USER_REJECTED => Self::UserRejected,
            CODE_UNKNOWN_CHAIN => Self::UnknownChain,
            _ => Self::Rpc {
                code,
                message: message.into(),
            },
        }
    }
}

/// The three provider events the session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<AccountAddress>),
    ChainChanged(ChainIdHex),
    Disconnected,
}

/// Injected-wallet boundary.
///
/// Not `Send`: implementations live on the single-threaded browser event
/// loop and wrap JS handles.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// `eth_requestAccounts`. Prompts the user on first call.
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ProviderError>;

    /// The address the wallet currently reports as selected, if any.
    fn selected_account(&self) -> Option<AccountAddress>;

    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<ChainIdHex, ProviderError>;

    /// `wallet_switchEthereumChain`. Fails with [`ProviderError::UnknownChain`]
    /// when the wallet has never seen the chain.
    async fn switch_chain(&self, chain: &ChainIdHex) -> Result<(), ProviderError>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError>;
}
