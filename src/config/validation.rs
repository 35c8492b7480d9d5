//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (chain id, decimals, timeouts)
//! - Check endpoint and explorer URLs actually parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: WalletConfig → Result<(), Vec<ValidationError>>

use crate::config::schema::WalletConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config field the error refers to.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn error(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let network = &config.network;

    if network.chain_id == 0 {
        errors.push(error("network.chain_id", "must be non-zero"));
    }
    if network.chain_name.trim().is_empty() {
        errors.push(error("network.chain_name", "must not be empty"));
    }
    // U256 holds at most 78 decimal digits.
    if network.native_currency.decimals > 77 {
        errors.push(error(
            "network.native_currency.decimals",
            "must be at most 77",
        ));
    }
    if network.rpc_urls.is_empty() {
        errors.push(error("network.rpc_urls", "at least one endpoint required"));
    }
    for rpc_url in &network.rpc_urls {
        if rpc_url.parse::<url::Url>().is_err() {
            errors.push(error("network.rpc_urls", format!("invalid URL '{rpc_url}'")));
        }
    }
    for explorer_url in &network.block_explorer_urls {
        if explorer_url.parse::<url::Url>().is_err() {
            errors.push(error(
                "network.block_explorer_urls",
                format!("invalid URL '{explorer_url}'"),
            ));
        }
    }
    if config.provider.rpc_timeout_secs == 0 {
        errors.push(error("provider.rpc_timeout_secs", "must be greater than zero"));
    }
    if config.storage.history_file.trim().is_empty() {
        errors.push(error("storage.history_file", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
