//! Crate-wide error taxonomy.
//!
//! Every failure surfaced to the user maps to one of these variants. None of
//! them are retried automatically; the one corrective path (chain switch,
//! then add-if-unknown) lives in the session connect logic.

use thiserror::Error;

use crate::provider::ProviderError;

/// Errors surfaced to the user by wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No external wallet agent could be reached at all.
    #[error("no wallet provider detected")]
    ProviderUnavailable,

    /// The user declined an account or signing request.
    #[error("request rejected by user")]
    UserRejected,

    /// The provider reported an error we do not handle specially.
    #[error("provider error: {0}")]
    Provider(String),

    /// Recipient input is not a well-formed account address.
    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),

    /// Amount input is non-numeric or not strictly positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount could not be converted to the chain's smallest unit.
    #[error("amount conversion failed: {0}")]
    AmountConversion(String),

    /// Transfer submission was rejected by the signer or the provider.
    #[error("transfer submission failed: {0}")]
    Submission(String),

    /// Operation needs a connected account and none is set.
    #[error("no wallet address connected")]
    NoActiveAddress,

    /// QR rendering failed.
    #[error("QR rendering failed: {0}")]
    Qr(String),

    /// Transfer history could not be persisted.
    #[error("history persistence failed: {0}")]
    History(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable => WalletError::ProviderUnavailable,
            ProviderError::Rejected => WalletError::UserRejected,
            other => WalletError::Provider(other.to_string()),
        }
    }
}
