use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ProviderError;

/// A transaction to be signed and submitted by the connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl TxRequest {
    pub fn call(to: Address, data: Bytes) -> Self {
        Self {
            to,
            value: U256::ZERO,
            data,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// The wallet the panel talks to: an account source, a signer that submits
/// transactions, and a read-only view of the chain.
///
/// Calls block until the underlying round-trip completes.
pub trait WalletProvider {
    /// Ask the wallet for its accounts; the first one is used.
    fn request_accounts(&mut self) -> Result<Vec<Address>, ProviderError>;

    /// Sign and broadcast `tx` from the connected account.
    fn send_transaction(&mut self, tx: TxRequest) -> Result<B256, ProviderError>;

    /// Block until `tx_hash` has `confirmations` confirmations or `timeout` elapses.
    fn wait_for_receipt(
        &mut self,
        tx_hash: B256,
        confirmations: u64,
        timeout: Duration,
    ) -> Result<TxReceipt, ProviderError>;

    /// `eth_call` against the latest block.
    fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError>;

    fn get_balance(&self, address: Address) -> Result<U256, ProviderError>;
}
