use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants;
use crate::error::ConfigError;

/// Where the displayed balance comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BalanceSource {
    /// `eth_getBalance` of the smart account.
    NativeBalance,
    /// The account's deposit held at the entry point (`getDeposit()`).
    #[default]
    DepositLedgerBalance,
}

/// How `send` moves funds out of the account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TransferStrategy {
    /// `execute(recipient, amount, 0x)` against the account's own balance.
    DirectExecute,
    /// `withdrawDepositTo(recipient, amount)` against the deposit.
    #[default]
    WithdrawDeposit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PanelConfig {
    pub chain_id: u64,
    pub factory_address: Address,
    // Read and surfaced, but nothing submits through the entry point yet.
    pub entry_point_address: Address,
    pub balance_source: BalanceSource,
    pub transfer_strategy: TransferStrategy,
    pub confirmations: u64,
    pub confirmation_timeout_secs: u64,
    pub receipt_poll_ms: u64,
    pub rpc_timeout_secs: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            chain_id: constants::CHAIN_ID,
            factory_address: Address::from_str(constants::FACTORY_ADDRESS)
                .expect("FACTORY_ADDRESS constant is a valid address"),
            entry_point_address: Address::from_str(constants::ENTRY_POINT_ADDRESS)
                .expect("ENTRY_POINT_ADDRESS constant is a valid address"),
            balance_source: BalanceSource::default(),
            transfer_strategy: TransferStrategy::default(),
            confirmations: constants::CONFIRMATIONS,
            confirmation_timeout_secs: constants::CONFIRMATION_TIMEOUT_SECS,
            receipt_poll_ms: constants::RECEIPT_POLL_MS,
            rpc_timeout_secs: constants::RPC_TIMEOUT_SECS,
        }
    }
}

impl PanelConfig {
    /// Parse a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PanelConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.factory_address == Address::ZERO {
            return Err(ConfigError::InvalidAddress {
                field: "factory",
                value: self.factory_address.to_string(),
            });
        }
        if self.chain_id == 0 {
            return Err(ConfigError::Zero("chain_id"));
        }
        if self.confirmations == 0 {
            return Err(ConfigError::Zero("confirmations"));
        }
        if self.confirmation_timeout_secs == 0 {
            return Err(ConfigError::Zero("confirmation_timeout_secs"));
        }
        if self.receipt_poll_ms == 0 {
            return Err(ConfigError::Zero("receipt_poll_ms"));
        }
        if self.rpc_timeout_secs == 0 {
            return Err(ConfigError::Zero("rpc_timeout_secs"));
        }
        Ok(())
    }
}

/// Parse a user-supplied address (recipient field, terminal argument).
pub fn parse_address(value: &str) -> Option<Address> {
    Address::from_str(value.trim()).ok()
}
