//! EIP-1193 provider bridge.
//!
//! Wraps the injected `window.ethereum` object and exposes it through
//! the [`WalletProvider`] trait so the session layer stays free of
//! JS interop.

use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect};
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use mp_provider::{NetworkConfig, ProviderError, ProviderEvent, WalletProvider};
use mp_types::{AccountAddress, ChainIdHex};

/// Handle to the injected provider. Cheap to clone.
#[derive(Clone)]
pub struct Eip1193Provider {
    ethereum: JsValue,
}

impl Eip1193Provider {
    /// Look up `window.ethereum`. Returns `None` when no wallet
    /// extension is installed.
    pub fn detect() -> Option<Eip1193Provider> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Eip1193Provider { ethereum })
    }

    /// Issue a JSON-RPC request through `ethereum.request()`.
    pub async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<JsValue, ProviderError> {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let payload = json!({ "method": method, "params": params })
            .serialize(&serializer)
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let request = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(|_| ProviderError::Transport("provider has no request method".into()))?;
        let request: Function = request
            .dyn_into()
            .map_err(|_| ProviderError::Transport("provider.request is not callable".into()))?;

        let promise: Promise = request
            .call1(&self.ethereum, &payload)
            .map_err(rpc_error)?
            .dyn_into()
            .map_err(|_| ProviderError::Transport("provider.request returned non-promise".into()))?;

        JsFuture::from(promise).await.map_err(rpc_error)
    }

    /// Register a handler for provider events. The closure is leaked;
    /// subscriptions live for the page lifetime.
    pub fn subscribe(&self, on_event: impl Fn(ProviderEvent) + Clone + 'static) {
        let on = match Reflect::get(&self.ethereum, &JsValue::from_str("on")) {
            Ok(on) if on.is_function() => on.unchecked_into::<Function>(),
            _ => return,
        };

        {
            let handler = on_event.clone();
            let closure = Closure::wrap(Box::new(move |accounts: JsValue| {
                let accounts = js_string_array(&accounts)
                    .into_iter()
                    .map(AccountAddress)
                    .collect();
                handler(ProviderEvent::AccountsChanged(accounts));
            }) as Box<dyn FnMut(JsValue)>);
            let _ = on.call2(
                &self.ethereum,
                &JsValue::from_str("accountsChanged"),
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let handler = on_event.clone();
            let closure = Closure::wrap(Box::new(move |chain_id: JsValue| {
                let chain_id = chain_id.as_string().unwrap_or_default();
                handler(ProviderEvent::ChainChanged(ChainIdHex(chain_id)));
            }) as Box<dyn FnMut(JsValue)>);
            let _ = on.call2(
                &self.ethereum,
                &JsValue::from_str("chainChanged"),
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::wrap(Box::new(move |_err: JsValue| {
                on_event(ProviderEvent::Disconnected);
            }) as Box<dyn FnMut(JsValue)>);
            let _ = on.call2(
                &self.ethereum,
                &JsValue::from_str("disconnect"),
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }
}

#[async_trait(?Send)]
impl WalletProvider for Eip1193Provider {
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ProviderError> {
        let accounts = self.request("eth_requestAccounts", json!([])).await?;
        Ok(js_string_array(&accounts)
            .into_iter()
            .map(AccountAddress)
            .collect())
    }

    fn selected_account(&self) -> Option<AccountAddress> {
        let selected =
            Reflect::get(&self.ethereum, &JsValue::from_str("selectedAddress")).ok()?;
        selected.as_string().map(AccountAddress)
    }

    async fn chain_id(&self) -> Result<ChainIdHex, ProviderError> {
        let chain_id = self.request("eth_chainId", json!([])).await?;
        match chain_id.as_string() {
            Some(hex) => Ok(ChainIdHex(hex)),
            None => Err(ProviderError::Transport(
                "eth_chainId returned non-string".into(),
            )),
        }
    }

    async fn switch_chain(&self, chain_id: &ChainIdHex) -> Result<(), ProviderError> {
        self.request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": chain_id.0 }]),
        )
        .await?;
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError> {
        self.request(
            "wallet_addEthereumChain",
            json!([{
                "chainId": network.chain_id.0,
                "rpcUrl": network.rpc_url,
            }]),
        )
        .await?;
        Ok(())
    }
}

/// Map a rejected JS promise into a [`ProviderError`], reading the
/// `code` and `message` fields EIP-1193 errors carry.
pub fn rpc_error(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64())
        .map(|code| code as i64);
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{err:?}"));

    match code {
        Some(code) => ProviderError::from_rpc(code, message),
        None => ProviderError::Transport(message),
    }
}

fn js_string_array(value: &JsValue) -> Vec<String> {
    if !Array::is_array(value) {
        return Vec::new();
    }
    Array::from(value)
        .iter()
        .filter_map(|entry| entry.as_string())
        .collect()
}
