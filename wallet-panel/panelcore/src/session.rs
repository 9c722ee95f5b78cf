//! Explicit session state for one connected wallet.
//!
//! Transitions: `Disconnected -> Connected -> Resolving -> Resolved`.
//! `Resolving` falls back to whatever preceded it when resolution fails.
//! Only `Resolved` carries an account, so only `Resolved` permits transfers.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::error::{ErrorInfo, PanelError};
use crate::units::format_amount;

pub const MAX_ACTIVITY_ENTRIES: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRecord {
    pub owner: Address,
    pub salt: B256,
    pub smart_account: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase")]
pub enum Phase {
    Disconnected,
    Connected { owner: Address },
    Resolving { owner: Address },
    Resolved { account: AccountRecord },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Disconnected => "Disconnected",
            Phase::Connected { .. } => "Connected",
            Phase::Resolving { .. } => "Resolving",
            Phase::Resolved { .. } => "Resolved",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceView {
    pub wei: U256,
    pub display: String,
    pub updated_at: i64,
}

impl BalanceView {
    pub fn new(wei: U256) -> Self {
        Self {
            wei,
            display: format_amount(wei),
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Form fields. Never cleared by the panel itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TransferIntent {
    pub amount: String,
    pub recipient: String,
}

impl TransferIntent {
    /// Apply form edits. Absent fields are left as they were.
    pub fn apply(&mut self, update: IntentUpdate) {
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(recipient) = update.recipient {
            self.recipient = recipient;
        }
    }
}

/// Partial edit of a `TransferIntent`, as submitted with a form action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IntentUpdate {
    pub amount: Option<String>,
    pub recipient: Option<String>,
}

impl IntentUpdate {
    /// Deposits have no recipient; only the amount is taken.
    pub fn amount_only(self) -> Self {
        Self {
            amount: self.amount,
            recipient: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Operation {
    Connect,
    Resolve,
    Refresh,
    Send,
    Deposit,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Connect => "connect",
            Operation::Resolve => "resolve",
            Operation::Refresh => "refresh",
            Operation::Send => "send",
            Operation::Deposit => "deposit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InFlight {
    pub id: String,
    pub operation: Operation,
    pub started_at: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityStatus {
    Succeeded,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityEntry {
    pub id: String,
    pub operation: Operation,
    pub status: ActivityStatus,
    pub detail: String,
    pub tx_hash: Option<B256>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub phase: Phase,
    pub balance: Option<BalanceView>,
    pub intent: TransferIntent,
    in_flight: Option<InFlight>,
    last_error: Option<ErrorInfo>,
    activity: VecDeque<ActivityEntry>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Disconnected,
            balance: None,
            intent: TransferIntent::default(),
            in_flight: None,
            last_error: None,
            activity: VecDeque::new(),
        }
    }

    pub fn owner(&self) -> Option<Address> {
        match &self.phase {
            Phase::Disconnected => None,
            Phase::Connected { owner } | Phase::Resolving { owner } => Some(*owner),
            Phase::Resolved { account } => Some(account.owner),
        }
    }

    pub fn account(&self) -> Option<&AccountRecord> {
        match &self.phase {
            Phase::Resolved { account } => Some(account),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    pub fn last_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }

    pub fn activity(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.activity.iter()
    }

    /// Take the exclusive in-flight lock for `operation`.
    ///
    /// Every successful `begin` must be paired with `finish` on all paths.
    pub fn begin(&mut self, operation: Operation) -> Result<String, PanelError> {
        if let Some(current) = &self.in_flight {
            return Err(PanelError::OperationInProgress(format!(
                "{} ({}) started at {}",
                current.operation, current.id, current.started_at
            )));
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.in_flight = Some(InFlight {
            id: id.clone(),
            operation,
            started_at: chrono::Utc::now().timestamp(),
        });
        Ok(id)
    }

    /// Release the lock taken by `begin`. A stale id is ignored.
    pub fn finish(&mut self, id: &str) {
        if self.in_flight.as_ref().map(|f| f.id.as_str()) == Some(id) {
            self.in_flight = None;
        }
    }

    /// Record a connected owner. Reconnecting with the same owner keeps the
    /// session; a different owner starts over from `Connected`.
    pub fn connect(&mut self, owner: Address) {
        if self.owner() == Some(owner) {
            return;
        }
        self.phase = Phase::Connected { owner };
        self.balance = None;
    }

    /// Enter `Resolving`, returning the previous phase for rollback.
    pub fn start_resolving(&mut self) -> Option<(Address, Phase)> {
        let owner = self.owner()?;
        let previous = std::mem::replace(&mut self.phase, Phase::Resolving { owner });
        Some((owner, previous))
    }

    /// Enter `Resolved`. Returns true when the account address changed
    /// (including unset -> set), which is when the balance must be re-read.
    pub fn resolve(&mut self, previous: &Phase, account: AccountRecord) -> bool {
        let changed = match previous {
            Phase::Resolved { account: old } => old.smart_account != account.smart_account,
            _ => true,
        };
        if changed {
            self.balance = None;
        }
        self.phase = Phase::Resolved { account };
        changed
    }

    pub fn rollback(&mut self, previous: Phase) {
        self.phase = previous;
    }

    pub fn set_balance(&mut self, wei: U256) -> &BalanceView {
        self.balance.insert(BalanceView::new(wei))
    }

    pub fn fail(&mut self, err: &PanelError) {
        self.last_error = Some(ErrorInfo::from(err));
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn record(
        &mut self,
        operation: Operation,
        status: ActivityStatus,
        detail: impl Into<String>,
        tx_hash: Option<B256>,
    ) {
        if self.activity.len() == MAX_ACTIVITY_ENTRIES {
            self.activity.pop_front();
        }
        self.activity.push_back(ActivityEntry {
            id: uuid::Uuid::new_v4().to_string(),
            operation,
            status,
            detail: detail.into(),
            tx_hash,
            timestamp: chrono::Utc::now().timestamp(),
        });
    }

    pub fn view(&self) -> SessionView {
        let account = self.account();
        SessionView {
            phase: self.phase.name().to_string(),
            owner: self.owner(),
            smart_account: account.map(|a| a.smart_account),
            salt: account.map(|a| format!("0x{}", hex::encode(a.salt))),
            balance: self.balance.as_ref().map(|b| b.display.clone()),
            balance_wei: self.balance.as_ref().map(|b| b.wei.to_string()),
            intent: self.intent.clone(),
            in_flight: self.in_flight.clone(),
            last_error: self.last_error.clone(),
            activity: self.activity.iter().rev().cloned().collect(),
        }
    }
}

/// Flattened snapshot handed to the UI. Activity is newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionView {
    pub phase: String,
    pub owner: Option<Address>,
    pub smart_account: Option<Address>,
    pub salt: Option<String>,
    pub balance: Option<String>,
    pub balance_wei: Option<String>,
    pub intent: TransferIntent,
    pub in_flight: Option<InFlight>,
    pub last_error: Option<ErrorInfo>,
    pub activity: Vec<ActivityEntry>,
}
