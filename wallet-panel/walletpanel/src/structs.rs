use alloy_primitives::{Address, U256};
use anyhow::anyhow;
use hyperware_process_lib::logging::{error, info, warn};
use hyperware_process_lib::signer::LocalSigner;
use hyperware_process_lib::{get_state, set_state};
use panelcore::error::ErrorInfo;
use panelcore::{
    BalanceView, IntentUpdate, PanelConfig, PanelError, Session, SessionView, TxReceipt,
    WalletPanel,
};
use serde::{Deserialize, Serialize};

use crate::chain::HotWalletProvider;

/// The only thing kept across restarts: the hot wallet acting as the
/// injected wallet. Session state always starts over.
#[derive(Serialize, Deserialize)]
pub struct WalletStore {
    pub signer: LocalSigner,
}

impl WalletStore {
    pub fn load_or_create(chain_id: u64) -> anyhow::Result<Self> {
        if let Some(bytes) = get_state() {
            match rmp_serde::from_slice::<Self>(&bytes) {
                Ok(store) => {
                    info!("Loaded hot wallet from saved state.");
                    return Ok(store);
                }
                Err(e) => error!("Failed to deserialize saved hot wallet: {}", e),
            }
        }
        let signer = LocalSigner::new_random(chain_id)
            .map_err(|e| anyhow!("failed to generate hot wallet: {:?}", e))?;
        let store = Self { signer };
        store.save()?;
        info!("Generated new hot wallet.");
        Ok(store)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let bytes = rmp_serde::to_vec(self)?;
        set_state(&bytes);
        Ok(())
    }
}

pub struct State {
    pub session: Session,
    pub panel: WalletPanel<HotWalletProvider>,
}

impl State {
    pub fn new(config: PanelConfig, signer: LocalSigner) -> Self {
        let provider = HotWalletProvider::new(signer, &config);
        Self {
            session: Session::new(),
            panel: WalletPanel::new(config, provider),
        }
    }

    pub fn view(&self) -> StateView {
        StateView {
            session: self.session.view(),
            hot_wallet: self.panel.provider().address(),
            config: self.panel.config().clone(),
        }
    }

    pub fn connect(&mut self) -> Result<Address, PanelError> {
        let result = self.panel.connect(&mut self.session);
        match &result {
            Ok(owner) => info!("Connected owner {}", owner),
            Err(e) => error!("connect failed: {}", e),
        }
        result
    }

    pub fn resolve(&mut self) -> Result<Option<Address>, PanelError> {
        let result = self.panel.resolve(&mut self.session);
        match &result {
            Ok(Some(account)) => info!("Smart account resolved: {}", account),
            Ok(None) => warn!("resolve ignored: no wallet connected"),
            Err(e) => error!("resolve failed for owner {:?}: {}", self.session.owner(), e),
        }
        result
    }

    pub fn refresh(&mut self) -> Result<Option<BalanceView>, PanelError> {
        let result = self.panel.refresh(&mut self.session);
        match &result {
            Ok(Some(balance)) => info!("Balance refreshed: {}", balance.display),
            Ok(None) => warn!("refresh ignored: no smart account resolved"),
            Err(e) => error!("refresh failed: {}", e),
        }
        result
    }

    pub fn send(&mut self, recipient: &str, amount: &str) -> Result<Option<TxReceipt>, PanelError> {
        let result = self.panel.send(&mut self.session, recipient, amount);
        log_transfer("send", &result, || format!("{amount} to {recipient}"));
        result
    }

    pub fn deposit(&mut self, amount: &str) -> Result<Option<TxReceipt>, PanelError> {
        let result = self.panel.deposit(&mut self.session, amount);
        log_transfer("deposit", &result, || amount.to_string());
        result
    }

    pub fn update_intent(&mut self, update: IntentUpdate) {
        self.session.intent.apply(update);
    }
}

fn log_transfer(
    label: &str,
    result: &Result<Option<TxReceipt>, PanelError>,
    describe: impl FnOnce() -> String,
) {
    match result {
        Ok(Some(receipt)) => info!("{} of {} confirmed in {}", label, describe(), receipt.tx_hash),
        Ok(None) => warn!("{} ignored: no smart account resolved", label),
        Err(e) => error!("{} of {} failed: {}", label, describe(), e),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    #[serde(flatten)]
    pub session: SessionView,
    pub hot_wallet: Address,
    pub config: PanelConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    pub state: StateView,
}

/// Wei amount rendered for terminal output.
pub fn describe_wei(wei: U256) -> String {
    format!("{} {}", panelcore::units::format_amount(wei), panelcore::constants::NATIVE_SYMBOL)
}
