//! Core of the smart-contract wallet panel.
//!
//! Everything here is independent of the process runtime: the error taxonomy,
//! amount handling, salt derivation, contract bindings, configuration, the
//! `WalletProvider` seam and the `WalletPanel` session orchestration. The
//! process crate supplies a `WalletProvider` backed by the node's eth
//! provider and a hot-wallet signer.

#[cfg_attr(feature = "staging", path = "../../../constants/staging.rs")]
#[cfg_attr(not(feature = "staging"), path = "../../../constants/production.rs")]
pub mod constants;

pub mod config;
pub mod contracts;
pub mod error;
pub mod panel;
pub mod provider;
pub mod salt;
pub mod session;
pub mod units;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use config::{BalanceSource, PanelConfig, TransferStrategy};
pub use error::{ConfigError, PanelError, ProviderError};
pub use panel::WalletPanel;
pub use provider::{TxReceipt, TxRequest, WalletProvider};
pub use session::{
    AccountRecord, BalanceView, IntentUpdate, Phase, Session, SessionView, TransferIntent,
};
