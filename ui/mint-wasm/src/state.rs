//! Application state.
//!
//! A single `App` lives in a thread-local slot. Async handlers `take()`
//! it for the duration of their work and `put()` it back; a handler that
//! finds the slot empty bails out, so at most one async operation runs
//! against the state at a time.

use std::cell::RefCell;

use gloo_console::warn;

use mp_flow::MintFlow;
use mp_session::SessionManager;

use crate::config;
use crate::eip1193::Eip1193Provider;
use crate::rpc::ProviderCaller;

pub struct App {
    pub session: SessionManager<Eip1193Provider>,
    pub flow: MintFlow<ProviderCaller>,
    pub provider: Option<Eip1193Provider>,
}

impl App {
    pub fn new(provider: Option<Eip1193Provider>) -> Self {
        let cfg = config::mint_config();
        let target = cfg.target;
        Self {
            session: SessionManager::new(provider.clone(), target),
            flow: MintFlow::new(cfg),
            provider,
        }
    }

    /// Bring the contract binding in line with the session's connected
    /// state. Call after anything that may change connectivity.
    pub async fn sync_connection(&mut self) {
        if let Err(err) = self.session.refresh_chain_id().await {
            warn!(format!("chain id refresh failed: {err}"));
        }

        let connected = self.session.is_connected();
        if connected && !self.flow.has_binding() {
            if let (Some(provider), Some(account)) =
                (self.provider.clone(), self.session.active_account().cloned())
            {
                let caller = ProviderCaller::new(provider, account);
                if let Err(err) = self.flow.on_connected_change(Some(caller)).await {
                    warn!(format!("sale state read failed: {err}"));
                }
            }
        } else if !connected && self.flow.has_binding() {
            let _ = self.flow.on_connected_change(None).await;
        }
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

pub fn init(app: App) {
    APP.with(|slot| *slot.borrow_mut() = Some(app));
}

/// Remove the app from the slot for an async operation.
pub fn take() -> Option<App> {
    APP.with(|slot| slot.borrow_mut().take())
}

pub fn put(app: App) {
    APP.with(|slot| *slot.borrow_mut() = Some(app));
}

/// Run a closure against the app without taking it. Returns `None`
/// while another operation holds the state.
pub fn with<R>(f: impl FnOnce(&App) -> R) -> Option<R> {
    APP.with(|slot| slot.borrow().as_ref().map(f))
}
