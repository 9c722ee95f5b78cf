//! In-memory chain implementing `WalletProvider`.
//!
//! Executes the factory and account ABIs by decoding calldata, keeps native
//! balances and entry-point deposits, and lets tests inject faults.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use std::cell::Cell;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::PanelConfig;
use crate::contracts::{account, factory};
use crate::error::ProviderError;
use crate::provider::{TxReceipt, TxRequest, WalletProvider};

/// Stand-in for the account proxy init code hash used in CREATE2 derivation.
pub const ACCOUNT_INIT_CODE_HASH: B256 = B256::repeat_byte(0x5a);

#[derive(Debug, Clone, Default)]
struct Ledger {
    balances: HashMap<Address, U256>,
    deposits: HashMap<Address, U256>,
    // account -> owner
    deployed: HashMap<Address, Address>,
}

#[derive(Debug, Clone, Default)]
pub struct CallCounts {
    pub account_requests: Cell<usize>,
    pub sends: Cell<usize>,
    pub calls: Cell<usize>,
    pub balance_reads: Cell<usize>,
}

impl CallCounts {
    fn bump(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }

    pub fn total(&self) -> usize {
        self.account_requests.get() + self.sends.get() + self.calls.get() + self.balance_reads.get()
    }
}

#[derive(Debug, Clone)]
pub struct MockChain {
    signer: Address,
    factory: Address,
    ledger: Ledger,
    receipts: HashMap<B256, TxReceipt>,
    nonce: u64,
    block: u64,
    pub counts: CallCounts,
    pub sent: Vec<TxRequest>,
    unavailable: bool,
    reject_accounts: Option<String>,
    fail_next_send: Option<ProviderError>,
    revert_next: bool,
    never_confirm: bool,
    fail_reads: bool,
}

impl MockChain {
    pub fn new(config: &PanelConfig, signer: Address, signer_balance: U256) -> Self {
        let mut ledger = Ledger::default();
        ledger.balances.insert(signer, signer_balance);
        Self {
            signer,
            factory: config.factory_address,
            ledger,
            receipts: HashMap::new(),
            nonce: 0,
            block: 1,
            counts: CallCounts::default(),
            sent: Vec::new(),
            unavailable: false,
            reject_accounts: None,
            fail_next_send: None,
            revert_next: false,
            never_confirm: false,
            fail_reads: false,
        }
    }

    /// Counterfactual address the factory assigns to `(owner, salt)`.
    pub fn account_address(&self, owner: Address, salt: U256) -> Address {
        let inner = keccak256((owner, salt).abi_encode());
        let mut preimage = Vec::with_capacity(85);
        preimage.push(0xff);
        preimage.extend_from_slice(self.factory.as_slice());
        preimage.extend_from_slice(inner.as_slice());
        preimage.extend_from_slice(ACCOUNT_INIT_CODE_HASH.as_slice());
        Address::from_slice(&keccak256(&preimage)[12..])
    }

    pub fn is_deployed(&self, account: Address) -> bool {
        self.ledger.deployed.contains_key(&account)
    }

    pub fn deployed_count(&self) -> usize {
        self.ledger.deployed.len()
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        self.ledger.balances.get(&address).copied().unwrap_or_default()
    }

    pub fn deposit_of(&self, account: Address) -> U256 {
        self.ledger.deposits.get(&account).copied().unwrap_or_default()
    }

    pub fn fund(&mut self, address: Address, amount: U256) {
        *self.ledger.balances.entry(address).or_default() += amount;
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn reject_accounts(&mut self, reason: &str) {
        self.reject_accounts = Some(reason.to_string());
    }

    pub fn switch_signer(&mut self, signer: Address) {
        self.signer = signer;
    }

    pub fn fail_next_send(&mut self, err: ProviderError) {
        self.fail_next_send = Some(err);
    }

    pub fn revert_next(&mut self) {
        self.revert_next = true;
    }

    pub fn set_never_confirm(&mut self, never: bool) {
        self.never_confirm = never;
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn network_calls(&self) -> usize {
        self.counts.total()
    }

    fn tx_hash(&self, tx: &TxRequest) -> B256 {
        let mut preimage = self.nonce.to_be_bytes().to_vec();
        preimage.extend_from_slice(self.signer.as_slice());
        preimage.extend_from_slice(tx.to.as_slice());
        preimage.extend_from_slice(&tx.data);
        keccak256(preimage)
    }

    /// Apply `tx` to `ledger`; `false` means the call reverted.
    fn execute(&self, ledger: &mut Ledger, tx: &TxRequest) -> bool {
        let from = self.signer;
        let sender_balance = ledger.balances.get(&from).copied().unwrap_or_default();
        if sender_balance < tx.value {
            return false;
        }
        ledger.balances.insert(from, sender_balance - tx.value);

        let selector: Option<[u8; 4]> = tx.data.get(..4).and_then(|s| s.try_into().ok());

        if tx.to == self.factory {
            let Some(factory::createAccountCall::SELECTOR) = selector else {
                return false;
            };
            let Ok(call) = factory::createAccountCall::abi_decode(&tx.data, true) else {
                return false;
            };
            let account = self.account_address(call.owner, call.salt);
            ledger.deployed.entry(account).or_insert(call.owner);
            *ledger.balances.entry(account).or_default() += tx.value;
            return true;
        }

        let Some(owner) = ledger.deployed.get(&tx.to).copied() else {
            *ledger.balances.entry(tx.to).or_default() += tx.value;
            return true;
        };
        let account_addr = tx.to;

        match selector {
            Some(account::addDepositCall::SELECTOR) => {
                *ledger.deposits.entry(account_addr).or_default() += tx.value;
                true
            }
            Some(account::executeCall::SELECTOR) => {
                let Ok(call) = account::executeCall::abi_decode(&tx.data, true) else {
                    return false;
                };
                if from != owner {
                    return false;
                }
                *ledger.balances.entry(account_addr).or_default() += tx.value;
                let held = ledger.balances.get(&account_addr).copied().unwrap_or_default();
                if held < call.value {
                    return false;
                }
                ledger.balances.insert(account_addr, held - call.value);
                *ledger.balances.entry(call.dest).or_default() += call.value;
                true
            }
            Some(account::withdrawDepositToCall::SELECTOR) => {
                let Ok(call) = account::withdrawDepositToCall::abi_decode(&tx.data, true) else {
                    return false;
                };
                if from != owner {
                    return false;
                }
                let deposit = ledger.deposits.get(&account_addr).copied().unwrap_or_default();
                if deposit < call.amount {
                    return false;
                }
                ledger.deposits.insert(account_addr, deposit - call.amount);
                *ledger.balances.entry(call.withdrawAddress).or_default() += call.amount;
                true
            }
            _ => false,
        }
    }
}

impl WalletProvider for MockChain {
    fn request_accounts(&mut self) -> Result<Vec<Address>, ProviderError> {
        CallCounts::bump(&self.counts.account_requests);
        if self.unavailable {
            return Err(ProviderError::Unavailable);
        }
        if let Some(reason) = &self.reject_accounts {
            return Err(ProviderError::Rejected(reason.clone()));
        }
        Ok(vec![self.signer])
    }

    fn send_transaction(&mut self, tx: TxRequest) -> Result<B256, ProviderError> {
        CallCounts::bump(&self.counts.sends);
        if self.unavailable {
            return Err(ProviderError::Unavailable);
        }
        if let Some(err) = self.fail_next_send.take() {
            return Err(err);
        }

        let tx_hash = self.tx_hash(&tx);
        let mut ledger = self.ledger.clone();
        let success = !std::mem::take(&mut self.revert_next) && self.execute(&mut ledger, &tx);
        if success {
            self.ledger = ledger;
        }

        self.nonce += 1;
        self.block += 1;
        self.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                block_number: Some(self.block),
                success,
            },
        );
        self.sent.push(tx);
        Ok(tx_hash)
    }

    fn wait_for_receipt(
        &mut self,
        tx_hash: B256,
        _confirmations: u64,
        timeout: Duration,
    ) -> Result<TxReceipt, ProviderError> {
        if self.never_confirm {
            return Err(ProviderError::Timeout(format!(
                "receipt of {tx_hash} after {}s",
                timeout.as_secs()
            )));
        }
        self.receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| ProviderError::Rpc(format!("unknown transaction {tx_hash}")))
    }

    fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        CallCounts::bump(&self.counts.calls);
        if self.fail_reads {
            return Err(ProviderError::Rpc("eth_call unavailable".to_string()));
        }
        let selector: Option<[u8; 4]> = data.get(..4).and_then(|s| s.try_into().ok());

        if to == self.factory {
            if let Some(factory::getAddressCall::SELECTOR) = selector {
                let call = factory::getAddressCall::abi_decode(&data, true)
                    .map_err(|e| ProviderError::Reverted(e.to_string()))?;
                return Ok(self.account_address(call.owner, call.salt).abi_encode().into());
            }
        }
        if self.is_deployed(to) {
            if let Some(account::getDepositCall::SELECTOR) = selector {
                return Ok(self.deposit_of(to).abi_encode().into());
            }
        }
        Err(ProviderError::Reverted(format!("no handler for call to {to}")))
    }

    fn get_balance(&self, address: Address) -> Result<U256, ProviderError> {
        CallCounts::bump(&self.counts.balance_reads);
        if self.fail_reads {
            return Err(ProviderError::Rpc("eth_getBalance unavailable".to_string()));
        }
        Ok(self.balance_of(address))
    }
}
