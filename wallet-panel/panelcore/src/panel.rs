use alloy_primitives::{Address, B256, U256};
use std::time::Duration;

use crate::config::{parse_address, BalanceSource, PanelConfig, TransferStrategy};
use crate::contracts;
use crate::error::{PanelError, ProviderError};
use crate::provider::{TxReceipt, TxRequest, WalletProvider};
use crate::salt::{derive_salt, salt_as_uint};
use crate::session::{AccountRecord, ActivityStatus, BalanceView, Operation, Session};
use crate::units::{format_amount, parse_amount};

/// Drives a `Session` through connect, create-or-access, balance reads and
/// transfers against a `WalletProvider`.
///
/// Operations that need a resolved account return `Ok(None)` when called
/// before one exists. Every failure is recorded on the session (last error
/// plus an activity entry) before being returned.
pub struct WalletPanel<P: WalletProvider> {
    config: PanelConfig,
    provider: P,
}

impl<P: WalletProvider> WalletPanel<P> {
    pub fn new(config: PanelConfig, provider: P) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn connect(&mut self, session: &mut Session) -> Result<Address, PanelError> {
        let id = lock(session, Operation::Connect)?;
        let result = self.request_owner();
        if let Ok(owner) = &result {
            session.connect(*owner);
        }
        settle(session, &id, Operation::Connect, &result, None, |owner| {
            format!("connected {owner}")
        });
        result
    }

    fn request_owner(&mut self) -> Result<Address, PanelError> {
        let accounts = self.provider.request_accounts().map_err(|e| match e {
            ProviderError::Rejected(reason) => PanelError::UserRejected(reason),
            _ => PanelError::ProviderUnavailable,
        })?;
        accounts
            .first()
            .copied()
            .ok_or_else(|| PanelError::UserRejected("wallet returned no accounts".to_string()))
    }

    /// Create-or-access the owner's smart account.
    pub fn resolve(&mut self, session: &mut Session) -> Result<Option<Address>, PanelError> {
        if session.owner().is_none() {
            skip(session, Operation::Resolve, "no wallet connected");
            return Ok(None);
        }
        let id = lock(session, Operation::Resolve)?;
        let Some((owner, previous)) = session.start_resolving() else {
            session.finish(&id);
            return Ok(None);
        };

        let result = self.create_or_access(owner);
        match &result {
            // a changed address drops the old balance before the re-read below
            Ok((record, _)) => {
                session.resolve(&previous, record.clone());
            }
            Err(_) => session.rollback(previous),
        }
        let tx_hash = result.as_ref().ok().map(|(_, receipt)| receipt.tx_hash);
        settle(session, &id, Operation::Resolve, &result, tx_hash, |(record, _)| {
            format!(
                "account {} for owner {} (salt 0x{})",
                record.smart_account,
                record.owner,
                hex::encode(record.salt)
            )
        });

        let address = result?.0.smart_account;
        // a failed read is recorded; it does not undo resolution
        let _ = self.refresh_locked(session);
        Ok(Some(address))
    }

    fn create_or_access(&mut self, owner: Address) -> Result<(AccountRecord, TxReceipt), PanelError> {
        let salt = derive_salt(owner);
        let salt_uint = salt_as_uint(salt);
        let factory = self.config.factory_address;

        let tx = TxRequest::call(factory, contracts::create_account_calldata(owner, salt_uint));
        let receipt = self.submit(tx).map_err(PanelError::from_factory)?;
        if !receipt.success {
            return Err(PanelError::FactoryCallFailed(format!(
                "createAccount reverted in 0x{}",
                hex::encode(receipt.tx_hash)
            )));
        }

        let data = self
            .provider
            .call(factory, contracts::get_address_calldata(owner, salt_uint))
            .map_err(PanelError::from_factory)?;
        let smart_account =
            contracts::decode_get_address(&data).map_err(PanelError::FactoryCallFailed)?;
        if smart_account == Address::ZERO {
            return Err(PanelError::FactoryCallFailed(
                "factory returned the zero address".to_string(),
            ));
        }

        Ok((
            AccountRecord {
                owner,
                salt,
                smart_account,
            },
            receipt,
        ))
    }

    /// Re-read the account balance from the configured source.
    pub fn refresh(&mut self, session: &mut Session) -> Result<Option<BalanceView>, PanelError> {
        if session.account().is_none() {
            skip(session, Operation::Refresh, "no smart account resolved");
            return Ok(None);
        }
        self.refresh_locked(session).map(Some)
    }

    // Reads only; callers holding the in-flight lock use this directly.
    fn refresh_locked(&mut self, session: &mut Session) -> Result<BalanceView, PanelError> {
        let Some(account) = session.account().map(|a| a.smart_account) else {
            return Err(PanelError::BalanceQueryFailed("no resolved account".to_string()));
        };
        let result = self
            .read_balance(account)
            .map(|wei| session.set_balance(wei).clone());
        record_outcome(session, Operation::Refresh, &result, None, |view| {
            format!("balance of {account}: {}", view.display)
        });
        result
    }

    fn read_balance(&self, account: Address) -> Result<U256, PanelError> {
        match self.config.balance_source {
            BalanceSource::NativeBalance => self
                .provider
                .get_balance(account)
                .map_err(|e| PanelError::BalanceQueryFailed(e.to_string())),
            BalanceSource::DepositLedgerBalance => {
                let data = self
                    .provider
                    .call(account, contracts::get_deposit_calldata())
                    .map_err(|e| PanelError::BalanceQueryFailed(e.to_string()))?;
                contracts::decode_get_deposit(&data).map_err(PanelError::BalanceQueryFailed)
            }
        }
    }

    /// Move `amount` out of the account to `recipient` using the configured strategy.
    pub fn send(
        &mut self,
        session: &mut Session,
        recipient: &str,
        amount: &str,
    ) -> Result<Option<TxReceipt>, PanelError> {
        let Some(account) = session.account().map(|a| a.smart_account) else {
            skip(session, Operation::Send, "no smart account resolved");
            return Ok(None);
        };
        let id = lock(session, Operation::Send)?;

        let result = parse_amount(amount).and_then(|value| {
            let to = parse_address(recipient)
                .ok_or_else(|| PanelError::InvalidAddress(recipient.to_string()))?;
            let data = match self.config.transfer_strategy {
                TransferStrategy::DirectExecute => contracts::execute_transfer_calldata(to, value),
                TransferStrategy::WithdrawDeposit => {
                    contracts::withdraw_deposit_to_calldata(to, value)
                }
            };
            self.transfer(TxRequest::call(account, data), "send")
                .map(|receipt| (receipt, to, value))
        });

        let tx_hash = result.as_ref().ok().map(|(receipt, _, _)| receipt.tx_hash);
        settle(session, &id, Operation::Send, &result, tx_hash, |(_, to, value)| {
            format!("sent {} to {to} via {:?}", format_amount(*value), self.config.transfer_strategy)
        });

        let (receipt, _, _) = result?;
        let _ = self.refresh_locked(session);
        Ok(Some(receipt))
    }

    /// Attach `amount` to `addDeposit()` on the account.
    pub fn deposit(
        &mut self,
        session: &mut Session,
        amount: &str,
    ) -> Result<Option<TxReceipt>, PanelError> {
        let Some(account) = session.account().map(|a| a.smart_account) else {
            skip(session, Operation::Deposit, "no smart account resolved");
            return Ok(None);
        };
        let id = lock(session, Operation::Deposit)?;

        let result = parse_amount(amount).and_then(|value| {
            let tx = TxRequest::call(account, contracts::add_deposit_calldata()).with_value(value);
            self.transfer(tx, "deposit").map(|receipt| (receipt, value))
        });

        let tx_hash = result.as_ref().ok().map(|(receipt, _)| receipt.tx_hash);
        settle(session, &id, Operation::Deposit, &result, tx_hash, |(_, value)| {
            format!("deposited {} into {account}", format_amount(*value))
        });

        let (receipt, _) = result?;
        let _ = self.refresh_locked(session);
        Ok(Some(receipt))
    }

    fn transfer(&mut self, tx: TxRequest, label: &str) -> Result<TxReceipt, PanelError> {
        let receipt = self.submit(tx).map_err(PanelError::from_transfer)?;
        if !receipt.success {
            return Err(PanelError::TransferFailed(format!(
                "{label} reverted in 0x{}",
                hex::encode(receipt.tx_hash)
            )));
        }
        Ok(receipt)
    }

    fn submit(&mut self, tx: TxRequest) -> Result<TxReceipt, ProviderError> {
        let tx_hash = self.provider.send_transaction(tx)?;
        self.provider.wait_for_receipt(
            tx_hash,
            self.config.confirmations,
            Duration::from_secs(self.config.confirmation_timeout_secs),
        )
    }
}

/// Take the in-flight lock, recording a rejection like any other failure.
fn lock(session: &mut Session, operation: Operation) -> Result<String, PanelError> {
    session.begin(operation).map_err(|err| {
        session.fail(&err);
        session.record(operation, ActivityStatus::Failed, err.to_string(), None);
        err
    })
}

fn skip(session: &mut Session, operation: Operation, reason: &str) {
    session.record(operation, ActivityStatus::Skipped, reason, None);
}

/// Release the lock and record the outcome of a locked operation.
fn settle<T>(
    session: &mut Session,
    id: &str,
    operation: Operation,
    result: &Result<T, PanelError>,
    tx_hash: Option<B256>,
    describe: impl FnOnce(&T) -> String,
) {
    session.finish(id);
    record_outcome(session, operation, result, tx_hash, describe);
}

fn record_outcome<T>(
    session: &mut Session,
    operation: Operation,
    result: &Result<T, PanelError>,
    tx_hash: Option<B256>,
    describe: impl FnOnce(&T) -> String,
) {
    match result {
        Ok(value) => {
            session.clear_error();
            session.record(operation, ActivityStatus::Succeeded, describe(value), tx_hash);
        }
        Err(err) => {
            session.fail(err);
            session.record(operation, ActivityStatus::Failed, err.to_string(), tx_hash);
        }
    }
}
