use mp_contract::{ContractCaller, ContractError, NftContract};
use mp_provider::WalletProvider;
use mp_session::{NetworkSwitchError, SessionManager};
use mp_types::{MintConfig, MintRequest, SalePhase, SaleState};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MintError {
    #[error("no wallet provider detected")]
    NoProvider,
    #[error("Not valid Amount")]
    InvalidQuantity,
    #[error("sale is paused")]
    SalePaused,
    #[error("a mint is already in progress")]
    MintInFlight,
    #[error("wallet not connected")]
    NotConnected,
    #[error(transparent)]
    NetworkSwitch(#[from] NetworkSwitchError),
    /// Submission or confirmation failed. Carries the display-ready
    /// revert reason; local state is left untouched so the user can retry.
    #[error("{0}")]
    Transaction(String),
}

/// What a mint attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintOutcome {
    Minted,
    /// Wrong network: the switch flow was started instead of submitting.
    /// The user re-invokes mint after the wallet switches.
    SwitchedNetwork,
}

/// Mint flow controller.
///
/// Owns the contract binding and the sale-state cache, both derived from
/// the session's connected state. The binding never exists while the
/// session is disconnected.
pub struct MintFlow<C> {
    config: MintConfig,
    contract: Option<NftContract<C>>,
    sale: Option<SaleState>,
    quantity: u32,
    mint_more: bool,
    in_flight: bool,
}

impl<C: ContractCaller> MintFlow<C> {
    pub fn new(config: MintConfig) -> Self {
        Self {
            config,
            contract: None,
            sale: None,
            quantity: 1,
            mint_more: false,
            in_flight: false,
        }
    }

    pub fn config(&self) -> &MintConfig {
        &self.config
    }

    pub fn has_binding(&self) -> bool {
        self.contract.is_some()
    }

    pub fn sale(&self) -> Option<&SaleState> {
        self.sale.as_ref()
    }

    /// Quantity to display in the input. Reset to 1 after a successful mint.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// True once at least one mint succeeded ("MINT MORE" label).
    pub fn mint_more(&self) -> bool {
        self.mint_more
    }

    /// True while the paused flag is set in the tracked sale state; the
    /// view disables the mint action outright instead of submitting.
    pub fn mint_disabled(&self) -> bool {
        self.sale.as_ref().is_some_and(|sale| sale.is_paused)
    }

    /// React to a session connectivity change. `Some(caller)` builds the
    /// contract binding (and reads the sale state when supply is
    /// tracked); `None` drops the binding and all derived state.
    pub async fn on_connected_change(&mut self, caller: Option<C>) -> Result<(), ContractError> {
        match caller {
            Some(caller) => {
                self.contract = Some(NftContract::new(self.config.contract_address, caller));
                if self.config.limits.tracks_supply() {
                    self.refresh_sale_state().await?;
                }
                Ok(())
            }
            None => {
                self.contract = None;
                self.sale = None;
                Ok(())
            }
        }
    }

    /// Re-read total supply, presale, and paused from the contract.
    pub async fn refresh_sale_state(&mut self) -> Result<(), ContractError> {
        let Some(contract) = &self.contract else {
            return Ok(());
        };
        let Some(max_supply) = self.config.limits.max_supply else {
            return Ok(());
        };
        let total_supply = contract.total_supply().await?;
        let is_presale = contract.presale().await?;
        let is_paused = contract.paused().await?;
        self.sale = Some(SaleState {
            total_supply,
            max_supply,
            is_presale,
            is_paused,
        });
        Ok(())
    }

    /// Check a raw input quantity against the ceiling and, when supply is
    /// tracked, the remaining headroom. Never touches the contract.
    pub fn validate_quantity(&self, quantity: i64) -> Result<u32, MintError> {
        if quantity <= 0 || quantity > i64::from(self.config.limits.ceiling) {
            return Err(MintError::InvalidQuantity);
        }
        let quantity = quantity as u32;
        if let Some(sale) = &self.sale {
            if u64::from(quantity) > sale.headroom() {
                return Err(MintError::InvalidQuantity);
            }
        }
        Ok(quantity)
    }

    /// Which contract entry point applies right now.
    pub fn sale_phase(&self) -> SalePhase {
        match &self.sale {
            Some(sale) if sale.is_presale => SalePhase::Presale,
            _ => SalePhase::Public,
        }
    }

    /// Validate, check the network, submit the mint transaction, and wait
    /// for confirmation.
    ///
    /// On a wrong network the switch flow is started and no transaction
    /// is submitted. At most one mint is in flight per flow instance.
    pub async fn mint<P: WalletProvider>(
        &mut self,
        quantity: i64,
        session: &SessionManager<P>,
    ) -> Result<MintOutcome, MintError> {
        if self.in_flight {
            return Err(MintError::MintInFlight);
        }
        let quantity = self.validate_quantity(quantity)?;
        if self.mint_disabled() {
            return Err(MintError::SalePaused);
        }
        if !session.has_provider() {
            return Err(MintError::NoProvider);
        }
        if !session.is_correct_network() {
            session.connect_to_network().await?;
            return Ok(MintOutcome::SwitchedNetwork);
        }
        if self.contract.is_none() {
            return Err(MintError::NotConnected);
        }

        let request = MintRequest {
            quantity,
            unit_price: self.config.unit_price,
        };

        self.in_flight = true;
        let result = self.submit(&request).await;
        self.in_flight = false;
        result?;

        info!(quantity = request.quantity, "mint confirmed");
        self.quantity = 1;
        self.mint_more = true;
        self.refresh_total_supply().await;
        Ok(MintOutcome::Minted)
    }

    async fn submit(&self, request: &MintRequest) -> Result<(), MintError> {
        let Some(contract) = &self.contract else {
            return Err(MintError::NotConnected);
        };
        let value = request.total_cost().ok_or(MintError::InvalidQuantity)?;
        let tx = match self.sale_phase() {
            SalePhase::Presale => contract.mint_pre_sale(request.quantity, value).await,
            SalePhase::Public => contract.mint_public_sale(request.quantity, value).await,
        }
        .map_err(transaction_error)?;
        contract.confirm(&tx).await.map_err(transaction_error)
    }

    /// Displayed supply must come from a fresh read, never from a local
    /// increment. A failed refresh keeps the stale value and is only logged.
    async fn refresh_total_supply(&mut self) {
        if let (Some(contract), Some(sale)) = (&self.contract, &mut self.sale) {
            match contract.total_supply().await {
                Ok(total_supply) => sale.total_supply = total_supply,
                Err(err) => warn!("failed to refresh total supply: {err}"),
            }
        }
    }
}

fn transaction_error(err: ContractError) -> MintError {
    MintError::Transaction(err.to_string())
}
