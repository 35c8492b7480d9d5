//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! The defaults describe the Sepolia test network so the binary runs with
//! no config file at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration for the wallet client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Target chain descriptor.
    pub network: NetworkDescriptor,

    /// Transfer-history persistence settings.
    pub storage: StorageConfig,

    /// Provider transport settings.
    pub provider: ProviderConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Static description of the single target chain.
///
/// Immutable once loaded. Mirrors the descriptor handed to a wallet agent
/// when asking it to add an unknown chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkDescriptor {
    /// Numeric chain identifier (11155111 for Sepolia).
    pub chain_id: u64,

    /// Human-readable chain name.
    pub chain_name: String,

    /// Native currency metadata.
    pub native_currency: NativeCurrency,

    /// JSON-RPC endpoints, in preference order.
    pub rpc_urls: Vec<String>,

    /// Block explorer base URLs, in preference order.
    pub block_explorer_urls: Vec<String>,
}

/// Native currency metadata for a chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    /// Decimal places between the display unit and the smallest unit.
    pub decimals: u8,
}

impl NetworkDescriptor {
    /// Preferred block explorer base, if any is configured.
    pub fn explorer_base(&self) -> Option<&str> {
        self.block_explorer_urls.first().map(String::as_str)
    }

    /// Explorer URL for a transaction hash.
    pub fn tx_url(&self, hash: &str) -> Option<String> {
        self.explorer_base()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), hash))
    }

    /// Explorer URL for an account address.
    pub fn address_url(&self, address: &str) -> Option<String> {
        self.explorer_base()
            .map(|base| format!("{}/address/{}", base.trim_end_matches('/'), address))
    }
}

impl Default for NetworkDescriptor {
    fn default() -> Self {
        Self {
            chain_id: 11_155_111,
            chain_name: "Sepolia".to_string(),
            native_currency: NativeCurrency {
                name: "SepoliaETH".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://rpc.sepolia.org".to_string()],
            block_explorer_urls: vec!["https://sepolia.etherscan.io".to_string()],
        }
    }
}

/// Transfer-history persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the history file. Defaults to the platform data
    /// directory when unset.
    pub data_dir: Option<PathBuf>,

    /// File name for the serialized transfer sequence.
    pub history_file: String,
}

impl StorageConfig {
    /// Resolve the history file path. A CLI override wins over the config
    /// value, which wins over the platform data directory.
    pub fn history_path(&self, override_dir: Option<&Path>) -> PathBuf {
        let dir = override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .or_else(|| dirs::data_dir().map(|d| d.join("sepolia-wallet")))
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(&self.history_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_file: "transactions.json".to_string(),
        }
    }
}

/// Provider transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// RPC request timeout in seconds. Applies to simple queries only, never
    /// to the confirmation wait.
    pub rpc_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            rpc_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_network_is_sepolia() {
        let network = NetworkDescriptor::default();
        assert_eq!(network.chain_id, 11_155_111);
        assert_eq!(network.chain_name, "Sepolia");
        assert_eq!(network.native_currency.symbol, "ETH");
        assert_eq!(network.native_currency.decimals, 18);
        assert!(!network.rpc_urls.is_empty());
    }

    #[test]
    fn test_explorer_links() {
        let network = NetworkDescriptor::default();
        assert_eq!(
            network.tx_url("0xabc").unwrap(),
            "https://sepolia.etherscan.io/tx/0xabc"
        );
        assert_eq!(
            network.address_url("0xdef").unwrap(),
            "https://sepolia.etherscan.io/address/0xdef"
        );
    }

    #[test]
    fn test_explorer_links_trailing_slash() {
        let mut network = NetworkDescriptor::default();
        network.block_explorer_urls = vec!["https://explorer.test/".to_string()];
        assert_eq!(
            network.tx_url("0xabc").unwrap(),
            "https://explorer.test/tx/0xabc"
        );
    }

    #[test]
    fn test_no_explorer_configured() {
        let mut network = NetworkDescriptor::default();
        network.block_explorer_urls.clear();
        assert!(network.tx_url("0xabc").is_none());
        assert!(network.address_url("0xabc").is_none());
    }

    #[test]
    fn test_history_path_override_wins() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/var/lib/wallet")),
            ..StorageConfig::default()
        };
        let path = storage.history_path(Some(Path::new("/tmp/override")));
        assert_eq!(path, PathBuf::from("/tmp/override/transactions.json"));

        let path = storage.history_path(None);
        assert_eq!(path, PathBuf::from("/var/lib/wallet/transactions.json"));
    }
}
