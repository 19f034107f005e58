//! Contract calls routed through the wallet provider.
//!
//! Reads go through `eth_call`, writes through `eth_sendTransaction`
//! signed by the active account, confirmations by polling
//! `eth_getTransactionReceipt`.

use alloy_primitives::{Address, Bytes, U256, hex};
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use js_sys::Reflect;
use serde_json::json;
use wasm_bindgen::JsValue;

use mp_contract::{ContractCaller, ContractError, TxHash, strip_revert_prefix};
use mp_provider::ProviderError;
use mp_types::AccountAddress;

use crate::eip1193::Eip1193Provider;

/// Receipt polling interval.
const RECEIPT_POLL_MS: u32 = 2_000;

/// [`ContractCaller`] backed by the injected provider, bound to the
/// account that signs submissions.
pub struct ProviderCaller {
    provider: Eip1193Provider,
    from: AccountAddress,
}

impl ProviderCaller {
    pub fn new(provider: Eip1193Provider, from: AccountAddress) -> Self {
        Self { provider, from }
    }
}

#[async_trait(?Send)]
impl ContractCaller for ProviderCaller {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ContractError> {
        let result = self
            .provider
            .request(
                "eth_call",
                json!([{ "to": to.to_string(), "data": data.to_string() }, "latest"]),
            )
            .await
            .map_err(contract_error)?;

        let hex_data = result
            .as_string()
            .ok_or_else(|| ContractError::Transport("eth_call returned non-string".into()))?;
        hex::decode(&hex_data)
            .map(Bytes::from)
            .map_err(|err| ContractError::Decode(err.to_string()))
    }

    async fn send(&self, to: Address, data: Bytes, value: U256) -> Result<TxHash, ContractError> {
        let result = self
            .provider
            .request(
                "eth_sendTransaction",
                json!([{
                    "from": self.from.0,
                    "to": to.to_string(),
                    "value": format!("{value:#x}"),
                    "data": data.to_string(),
                }]),
            )
            .await
            .map_err(contract_error)?;

        match result.as_string() {
            Some(hash) => Ok(TxHash(hash)),
            None => Err(ContractError::Transport(
                "eth_sendTransaction returned non-string".into(),
            )),
        }
    }

    async fn confirm(&self, tx: &TxHash) -> Result<(), ContractError> {
        loop {
            let receipt = self
                .provider
                .request("eth_getTransactionReceipt", json!([tx.0]))
                .await
                .map_err(contract_error)?;

            if !receipt.is_null() && !receipt.is_undefined() {
                let status = Reflect::get(&receipt, &JsValue::from_str("status"))
                    .ok()
                    .and_then(|status| status.as_string());
                return match status.as_deref() {
                    Some("0x1") => Ok(()),
                    _ => Err(ContractError::Reverted {
                        reason: "transaction reverted".to_owned(),
                    }),
                };
            }

            TimeoutFuture::new(RECEIPT_POLL_MS).await;
        }
    }
}

/// Translate provider-level failures into contract errors with a
/// display-ready reason.
fn contract_error(err: ProviderError) -> ContractError {
    match err {
        ProviderError::UserRejected => ContractError::Reverted {
            reason: "User rejected the transaction".to_owned(),
        },
        ProviderError::Rpc { message, .. } if message.starts_with("execution reverted") => {
            ContractError::Reverted {
                reason: strip_revert_prefix(&message).to_owned(),
            }
        }
        other => ContractError::Transport(other.to_string()),
    }
}
