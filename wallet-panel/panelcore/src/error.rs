use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by a `WalletProvider`. These are mapped into
/// `PanelError` by the operation that made the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("no wallet provider available")]
    Unavailable,
    #[error("request rejected by wallet: {0}")]
    Rejected(String),
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("transaction reverted: {0}")]
    Reverted(String),
    #[error("timed out waiting for {0}")]
    Timeout(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {field} address {value:?}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("malformed config json: {0}")]
    Json(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("no compatible wallet provider detected")]
    ProviderUnavailable,
    #[error("wallet declined the request: {0}")]
    UserRejected(String),
    #[error("factory call failed: {0}")]
    FactoryCallFailed(String),
    #[error("transaction not confirmed: {0}")]
    ConfirmationTimeout(String),
    #[error("balance query failed: {0}")]
    BalanceQueryFailed(String),
    #[error("invalid amount {input:?}: {reason}")]
    AmountParseError { input: String, reason: String },
    #[error("invalid address {0:?}")]
    InvalidAddress(String),
    #[error("transfer failed: {0}")]
    TransferFailed(String),
    #[error("another operation is in progress: {0}")]
    OperationInProgress(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PanelError {
    /// Stable identifier used in API responses and the activity log.
    pub fn kind(&self) -> &'static str {
        match self {
            PanelError::ProviderUnavailable => "ProviderUnavailable",
            PanelError::UserRejected(_) => "UserRejected",
            PanelError::FactoryCallFailed(_) => "FactoryCallFailed",
            PanelError::ConfirmationTimeout(_) => "ConfirmationTimeout",
            PanelError::BalanceQueryFailed(_) => "BalanceQueryFailed",
            PanelError::AmountParseError { .. } => "AmountParseError",
            PanelError::InvalidAddress(_) => "InvalidAddress",
            PanelError::TransferFailed(_) => "TransferFailed",
            PanelError::OperationInProgress(_) => "OperationInProgress",
            PanelError::Config(_) => "Config",
        }
    }

    /// HTTP status reported for this error by the API.
    pub fn status_code(&self) -> u16 {
        match self {
            PanelError::AmountParseError { .. } | PanelError::InvalidAddress(_) => 400,
            PanelError::UserRejected(_) => 403,
            PanelError::OperationInProgress(_) => 409,
            PanelError::ProviderUnavailable => 503,
            PanelError::ConfirmationTimeout(_) => 504,
            PanelError::FactoryCallFailed(_)
            | PanelError::BalanceQueryFailed(_)
            | PanelError::TransferFailed(_) => 502,
            PanelError::Config(_) => 500,
        }
    }

    pub fn amount(input: &str, reason: impl Into<String>) -> Self {
        PanelError::AmountParseError {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Map a provider failure during a factory interaction.
    pub(crate) fn from_factory(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable => PanelError::ProviderUnavailable,
            ProviderError::Timeout(what) => PanelError::ConfirmationTimeout(what),
            other => PanelError::FactoryCallFailed(other.to_string()),
        }
    }

    /// Map a provider failure during `send` or `deposit`.
    pub(crate) fn from_transfer(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable => PanelError::ProviderUnavailable,
            ProviderError::Timeout(what) => PanelError::ConfirmationTimeout(what),
            other => PanelError::TransferFailed(other.to_string()),
        }
    }
}

/// Serializable form of the last error, as exposed by the state view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: String,
    pub message: String,
}

impl From<&PanelError> for ErrorInfo {
    fn from(err: &PanelError) -> Self {
        ErrorInfo {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
