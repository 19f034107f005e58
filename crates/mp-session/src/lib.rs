use mp_provider::{NetworkConfig, ProviderError, ProviderEvent, WalletProvider, network_for};
use mp_types::{AccountAddress, Session, TargetNetwork};
use thiserror::Error;
use tracing::{info, warn};

/// Raised when neither switching to nor adding the target chain worked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("network switch failed: {0}")]
pub struct NetworkSwitchError(pub String);

/// What the view layer must do after an event was folded into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    None,
    /// The active account changed (or went away). Carries the new one.
    AccountChanged(Option<AccountAddress>),
    /// The session was torn down; re-initialize and re-render from scratch.
    Reset,
}

/// Wallet session manager.
///
/// Owns the [`Session`] record and is the only code that mutates it.
/// Constructed with `None` when no wallet extension is injected, in which
/// case every connect operation is a silent no-op and the view shows the
/// install hint instead.
pub struct SessionManager<P> {
    provider: Option<P>,
    session: Session,
    target: NetworkConfig,
}

impl<P: WalletProvider> SessionManager<P> {
    pub fn new(provider: Option<P>, target: TargetNetwork) -> Self {
        Self {
            provider,
            session: Session::default(),
            target: network_for(target),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn target_network(&self) -> &NetworkConfig {
        &self.target
    }

    pub fn active_account(&self) -> Option<&AccountAddress> {
        self.session.active_account.as_ref()
    }

    /// Request account access. No-op when no provider is present.
    pub async fn connect_wallet(&mut self) -> Result<(), ProviderError> {
        let Some(provider) = &self.provider else {
            return Ok(());
        };
        let accounts = provider.request_accounts().await?;
        info!(count = accounts.len(), "wallet accounts granted");
        Self::apply_accounts(&mut self.session, accounts);
        Ok(())
    }

    /// True when the provider reports a selected address or the local
    /// account list is non-empty. Pure query.
    pub fn is_connected(&self) -> bool {
        match &self.provider {
            Some(provider) => {
                provider.selected_account().is_some() || !self.session.accounts.is_empty()
            }
            None => false,
        }
    }

    /// True iff the session's chain id matches the configured target.
    pub fn is_correct_network(&self) -> bool {
        self.session.chain_id.as_ref() == Some(&self.target.chain_id)
    }

    /// Read the provider's current chain id into the session. Triggers a
    /// connect request first when no accounts are known yet.
    pub async fn refresh_chain_id(&mut self) -> Result<(), ProviderError> {
        let Some(provider) = &self.provider else {
            return Ok(());
        };
        if self.session.accounts.is_empty() {
            let accounts = provider.request_accounts().await?;
            Self::apply_accounts(&mut self.session, accounts);
        }
        self.session.chain_id = Some(provider.chain_id().await?);
        Ok(())
    }

    /// Ask the wallet to switch to the target chain, falling back to
    /// adding it (with the hard-coded RPC endpoint) when the wallet does
    /// not know the chain.
    pub async fn connect_to_network(&self) -> Result<(), NetworkSwitchError> {
        let Some(provider) = &self.provider else {
            return Err(NetworkSwitchError("no wallet provider".to_owned()));
        };
        match provider.switch_chain(&self.target.chain_id).await {
            Ok(()) => Ok(()),
            Err(ProviderError::UnknownChain) => {
                info!(chain = %self.target.chain_id.0, "target chain unknown, requesting add");
                provider
                    .add_chain(&self.target)
                    .await
                    .map_err(|err| NetworkSwitchError(format!("adding network: {err}")))
            }
            Err(err) => Err(NetworkSwitchError(format!("switching network: {err}"))),
        }
    }

    /// Fold a provider event into the session and report what the view
    /// layer must do next.
    pub fn handle_event(&mut self, event: ProviderEvent) -> SessionEffect {
        match event {
            ProviderEvent::AccountsChanged(accounts) => {
                Self::apply_accounts(&mut self.session, accounts);
                SessionEffect::AccountChanged(self.session.active_account.clone())
            }
            ProviderEvent::ChainChanged(chain) => {
                info!(chain = %chain.0, "chain changed, resetting session");
                self.reset();
                SessionEffect::Reset
            }
            ProviderEvent::Disconnected => {
                warn!("provider disconnected, resetting session");
                self.reset();
                SessionEffect::Reset
            }
        }
    }

    /// Clear local UI state only. The provider may still consider itself
    /// connected; a later connect re-attaches without prompting.
    pub fn disconnect_local(&mut self) {
        self.session.connected = false;
        self.session.accounts.clear();
        self.session.active_account = None;
    }

    /// Return the session to its initial empty state.
    pub fn reset(&mut self) {
        self.session = Session::default();
    }

    fn apply_accounts(session: &mut Session, accounts: Vec<AccountAddress>) {
        session.active_account = accounts.first().cloned();
        session.connected = !accounts.is_empty();
        session.accounts = accounts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mp_types::ChainIdHex;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockProvider {
        accounts: Vec<AccountAddress>,
        selected: Option<AccountAddress>,
        chain: Option<ChainIdHex>,
        switch_error: Option<ProviderError>,
        add_error: Option<ProviderError>,
        calls: RefCell<Vec<String>>,
    }

    impl MockProvider {
        fn record(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for MockProvider {
        async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ProviderError> {
            self.record("request_accounts");
            Ok(self.accounts.clone())
        }

        fn selected_account(&self) -> Option<AccountAddress> {
            self.selected.clone()
        }

        async fn chain_id(&self) -> Result<ChainIdHex, ProviderError> {
            self.record("chain_id");
            self.chain
                .clone()
                .ok_or_else(|| ProviderError::Transport("no chain".to_owned()))
        }

        async fn switch_chain(&self, chain: &ChainIdHex) -> Result<(), ProviderError> {
            self.record(format!("switch_chain:{}", chain.0));
            match &self.switch_error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError> {
            self.record(format!("add_chain:{}:{}", network.chain_id.0, network.rpc_url));
            match &self.add_error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    fn account(s: &str) -> AccountAddress {
        AccountAddress(s.to_owned())
    }

    #[tokio::test]
    async fn connect_without_provider_is_silent() {
        let mut manager: SessionManager<MockProvider> =
            SessionManager::new(None, TargetNetwork::Testnet);
        manager.connect_wallet().await.unwrap();
        assert!(!manager.is_connected());
        assert_eq!(*manager.session(), Session::default());
    }

    #[tokio::test]
    async fn connect_records_accounts_and_active() {
        let provider = MockProvider {
            accounts: vec![account("0xaaa"), account("0xbbb")],
            ..Default::default()
        };
        let mut manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);

        manager.connect_wallet().await.unwrap();

        assert!(manager.is_connected());
        assert!(manager.session().connected);
        assert_eq!(manager.active_account(), Some(&account("0xaaa")));
        assert_eq!(manager.session().accounts.len(), 2);
    }

    #[tokio::test]
    async fn connected_via_selected_address_alone() {
        let provider = MockProvider {
            selected: Some(account("0xaaa")),
            ..Default::default()
        };
        let manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn refresh_chain_id_connects_first_when_needed() {
        let provider = MockProvider {
            accounts: vec![account("0xaaa")],
            chain: Some(ChainIdHex("0x4".to_owned())),
            ..Default::default()
        };
        let mut manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);

        manager.refresh_chain_id().await.unwrap();

        assert!(manager.is_correct_network());
        let calls = manager.provider.as_ref().unwrap().calls.borrow().clone();
        assert_eq!(calls, vec!["request_accounts", "chain_id"]);
    }

    #[tokio::test]
    async fn wrong_chain_is_not_correct_network() {
        let provider = MockProvider {
            accounts: vec![account("0xaaa")],
            chain: Some(ChainIdHex("0x1".to_owned())),
            ..Default::default()
        };
        let mut manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);
        manager.refresh_chain_id().await.unwrap();
        assert!(!manager.is_correct_network());
    }

    #[tokio::test]
    async fn switch_falls_back_to_add_chain_for_unknown_chain() {
        let provider = MockProvider {
            switch_error: Some(ProviderError::UnknownChain),
            ..Default::default()
        };
        let manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);

        manager.connect_to_network().await.unwrap();

        let calls = manager.provider.as_ref().unwrap().calls.borrow().clone();
        assert_eq!(
            calls,
            vec![
                "switch_chain:0x4",
                "add_chain:0x4:https://rinkeby-light.eth.linkpool.io/"
            ]
        );
    }

    #[tokio::test]
    async fn switch_failure_is_reported() {
        let provider = MockProvider {
            switch_error: Some(ProviderError::UserRejected),
            ..Default::default()
        };
        let manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);

        let err = manager.connect_to_network().await.unwrap_err();
        assert!(err.0.contains("switching network"));
    }

    #[tokio::test]
    async fn add_chain_failure_is_reported() {
        let provider = MockProvider {
            switch_error: Some(ProviderError::UnknownChain),
            add_error: Some(ProviderError::UserRejected),
            ..Default::default()
        };
        let manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);

        let err = manager.connect_to_network().await.unwrap_err();
        assert!(err.0.contains("adding network"));
    }

    #[tokio::test]
    async fn accounts_changed_event_updates_active_account() {
        let mut manager = SessionManager::new(
            Some(MockProvider::default()),
            TargetNetwork::Testnet,
        );

        let effect = manager.handle_event(ProviderEvent::AccountsChanged(vec![account("0xccc")]));
        assert_eq!(effect, SessionEffect::AccountChanged(Some(account("0xccc"))));
        assert!(manager.session().connected);

        let effect = manager.handle_event(ProviderEvent::AccountsChanged(Vec::new()));
        assert_eq!(effect, SessionEffect::AccountChanged(None));
        assert!(!manager.session().connected);
    }

    #[tokio::test]
    async fn disconnect_event_clears_session_and_resets() {
        let provider = MockProvider {
            accounts: vec![account("0xaaa")],
            chain: Some(ChainIdHex("0x4".to_owned())),
            ..Default::default()
        };
        let mut manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);
        manager.refresh_chain_id().await.unwrap();
        assert!(manager.session().connected);

        let effect = manager.handle_event(ProviderEvent::Disconnected);

        assert_eq!(effect, SessionEffect::Reset);
        assert_eq!(*manager.session(), Session::default());
    }

    #[tokio::test]
    async fn chain_changed_event_resets_session() {
        let mut manager = SessionManager::new(
            Some(MockProvider::default()),
            TargetNetwork::Testnet,
        );
        manager.handle_event(ProviderEvent::AccountsChanged(vec![account("0xaaa")]));

        let effect = manager.handle_event(ProviderEvent::ChainChanged(ChainIdHex("0x1".to_owned())));

        assert_eq!(effect, SessionEffect::Reset);
        assert_eq!(*manager.session(), Session::default());
    }

    #[tokio::test]
    async fn local_disconnect_overrides_provider_selected_account() {
        let provider = MockProvider {
            accounts: vec![account("0xaaa")],
            selected: Some(account("0xaaa")),
            chain: Some(ChainIdHex("0x4".to_owned())),
            ..Default::default()
        };
        let mut manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);
        manager.refresh_chain_id().await.unwrap();
        assert!(manager.session().connected);

        manager.disconnect_local();

        // The provider still reports a selected address; the session's
        // own flag is what a display layer must follow.
        assert!(manager.is_connected());
        assert!(!manager.session().connected);
    }

    #[tokio::test]
    async fn local_disconnect_keeps_chain_id() {
        let provider = MockProvider {
            accounts: vec![account("0xaaa")],
            chain: Some(ChainIdHex("0x4".to_owned())),
            ..Default::default()
        };
        let mut manager = SessionManager::new(Some(provider), TargetNetwork::Testnet);
        manager.refresh_chain_id().await.unwrap();

        manager.disconnect_local();

        assert!(!manager.session().connected);
        assert!(manager.session().accounts.is_empty());
        assert_eq!(manager.session().chain_id, Some(ChainIdHex("0x4".to_owned())));
    }
}
