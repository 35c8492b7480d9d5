//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::WalletConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<WalletConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: WalletConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_config() {
        let file = write_config(
            r#"
            [network]
            chain_id = 11155111
            chain_name = "Sepolia"
            rpc_urls = ["https://rpc.sepolia.org"]
            block_explorer_urls = ["https://sepolia.etherscan.io"]
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.network.chain_id, 11_155_111);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.provider.rpc_timeout_secs, 10);
        assert_eq!(config.storage.history_file, "transactions.json");
    }

    #[test]
    fn test_invalid_config_fails_validation() {
        let file = write_config(
            r#"
            [network]
            chain_id = 0
            "#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validation_errors_joined_in_display() {
        let file = write_config(
            r#"
            [network]
            chain_id = 0
            chain_name = ""
            "#,
        );
        let err = load_config(file.path()).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("Validation failed: "));
        assert!(text.contains("network.chain_id"));
        assert!(text.contains("network.chain_name"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/wallet.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
