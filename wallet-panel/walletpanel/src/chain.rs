//! `WalletProvider` backed by the node's eth provider and a process-held
//! hot wallet.

use alloy_primitives::{Address, Bytes, B256, U256};
use hyperware_process_lib::eth::{self, EthError, TransactionInput, TransactionRequest};
use hyperware_process_lib::logging::{debug, info, warn};
use hyperware_process_lib::signer::{LocalSigner, Signer, TransactionData};
use panelcore::{PanelConfig, ProviderError, TxReceipt, TxRequest, WalletProvider};
use std::thread;
use std::time::Duration;

pub struct HotWalletProvider {
    signer: LocalSigner,
    provider: eth::Provider,
    chain_id: u64,
    poll_interval: Duration,
}

impl HotWalletProvider {
    pub fn new(signer: LocalSigner, config: &PanelConfig) -> Self {
        Self {
            signer,
            provider: eth::Provider::new(config.chain_id, config.rpc_timeout_secs),
            chain_id: config.chain_id,
            poll_interval: Duration::from_millis(config.receipt_poll_ms),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    fn request(&self, to: Address, data: Bytes) -> TransactionRequest {
        TransactionRequest::default()
            .from(self.signer.address())
            .to(to)
            .input(TransactionInput::new(data))
    }
}

fn rpc(context: &str, err: EthError) -> ProviderError {
    ProviderError::Rpc(format!("{context}: {err:?}"))
}

fn to_u64(value: U256, what: &str) -> Result<u64, ProviderError> {
    u64::try_from(value).map_err(|_| ProviderError::Rpc(format!("{what} out of range: {value}")))
}

fn to_u128(value: U256, what: &str) -> Result<u128, ProviderError> {
    u128::try_from(value).map_err(|_| ProviderError::Rpc(format!("{what} out of range: {value}")))
}

impl WalletProvider for HotWalletProvider {
    fn request_accounts(&mut self) -> Result<Vec<Address>, ProviderError> {
        // an unreachable chain is treated as "no provider"
        let block = self.provider.get_block_number().map_err(|e| {
            warn!("eth provider for chain {} unreachable: {:?}", self.chain_id, e);
            ProviderError::Unavailable
        })?;
        debug!("eth provider reachable at block {}", block);
        Ok(vec![self.signer.address()])
    }

    fn send_transaction(&mut self, tx: TxRequest) -> Result<B256, ProviderError> {
        let from = self.signer.address();
        let nonce = self
            .provider
            .get_transaction_count(from, None)
            .map_err(|e| rpc("nonce", e))?;
        let gas_price = self.provider.get_gas_price().map_err(|e| rpc("gas price", e))?;
        // gas is whatever the node estimates; an estimate failure is a would-be revert
        let gas_limit = self
            .provider
            .estimate_gas(self.request(tx.to, tx.data.clone()).value(tx.value), None)
            .map_err(|e| ProviderError::Reverted(format!("gas estimation: {e:?}")))?;

        let tx_data = TransactionData {
            to: tx.to,
            value: tx.value,
            data: Some(tx.data.to_vec()),
            nonce: to_u64(nonce, "nonce")?,
            gas_limit: to_u64(gas_limit, "gas limit")?,
            gas_price: to_u128(gas_price, "gas price")?,
            max_priority_fee: None,
            chain_id: self.chain_id,
        };
        let signed = self
            .signer
            .sign_transaction(&tx_data)
            .map_err(|e| ProviderError::Rejected(format!("signing failed: {e:?}")))?;

        let tx_hash = self
            .provider
            .send_raw_transaction(Bytes::from(signed))
            .map_err(|e| rpc("broadcast", e))?;
        info!(
            "submitted tx {} to {} (value {}, selector 0x{})",
            tx_hash,
            tx.to,
            tx.value,
            hex::encode(tx.data.get(..4).unwrap_or_default())
        );
        Ok(tx_hash)
    }

    fn wait_for_receipt(
        &mut self,
        tx_hash: B256,
        confirmations: u64,
        timeout: Duration,
    ) -> Result<TxReceipt, ProviderError> {
        let poll_ms = self.poll_interval.as_millis().max(1);
        let attempts = (timeout.as_millis() / poll_ms).max(1);

        for attempt in 1..=attempts {
            match self.provider.get_transaction_receipt(tx_hash) {
                Ok(Some(receipt)) => {
                    if let Some(mined_in) = receipt.block_number {
                        match self.provider.get_block_number() {
                            Ok(latest) if latest + 1 >= mined_in + confirmations => {
                                return Ok(TxReceipt {
                                    tx_hash,
                                    block_number: Some(mined_in),
                                    success: receipt.status(),
                                });
                            }
                            Ok(latest) => debug!(
                                "tx {} mined in {}, latest {}, waiting for {} confirmations",
                                tx_hash, mined_in, latest, confirmations
                            ),
                            Err(e) => warn!("block number lookup failed for {}: {:?}", tx_hash, e),
                        }
                    }
                }
                Ok(None) => debug!("tx {} pending (attempt {}/{})", tx_hash, attempt, attempts),
                Err(e) => warn!("receipt lookup failed for {}: {:?}", tx_hash, e),
            }
            thread::sleep(self.poll_interval);
        }

        Err(ProviderError::Timeout(format!(
            "receipt of {} after {}s",
            tx_hash,
            timeout.as_secs()
        )))
    }

    fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        self.provider
            .call(self.request(to, data), None)
            .map_err(|e| rpc("eth_call", e))
    }

    fn get_balance(&self, address: Address) -> Result<U256, ProviderError> {
        self.provider
            .get_balance(address, None)
            .map_err(|e| rpc("eth_getBalance", e))
    }
}
