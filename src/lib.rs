//! Sepolia Wallet Client Library
//!
//! A console wallet for sending native-currency transfers on one configured
//! test network. The external wallet agent is modeled as a capability trait
//! (`provider::WalletProvider`) so the whole submission flow can be driven by
//! a mock in tests; the production implementation talks JSON-RPC via alloy
//! and signs with a locally held key.

pub mod config;
pub mod error;
pub mod history;
pub mod observability;
pub mod provider;
pub mod qr;
pub mod session;
pub mod transfer;
pub mod ui;

pub use config::schema::{NetworkDescriptor, WalletConfig};
pub use error::{WalletError, WalletResult};
pub use history::{TransactionLog, TransferRecord};
pub use session::WalletSession;
pub use transfer::{SubmitStatus, TransferSubmitter};
