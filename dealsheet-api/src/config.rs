//! API Configuration Module
//!
//! Server address, CORS, table names and store selection, loaded from
//! environment variables with development defaults.

use dealsheet_core::TableNames;
use std::net::SocketAddr;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid port value: {0}")]
    InvalidPort(String),

    #[error("Invalid bind address {address}: {reason}")]
    InvalidBindAddress { address: String, reason: String },

    #[error("Unknown store kind '{0}' (expected 'sheets' or 'memory')")]
    UnknownStore(String),

    #[error("Table name for {0} must not be empty")]
    EmptyTableName(&'static str),
}

// ============================================================================
// STORE KIND
// ============================================================================

/// Which [`TableStore`](dealsheet_storage::TableStore) backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    /// Google Sheets; credentials come from `GOOGLE_SHEETS_*`.
    #[default]
    Sheets,
    /// In-process tables seeded with headers only. Data is lost on exit.
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sheets" | "google" => Ok(StoreKind::Sheets),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => Err(ConfigError::UnknownStore(other.to_string())),
        }
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,

    /// Allowed CORS origins. Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    pub tables: TableNames,

    pub store: StoreKind,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_origins: Vec::new(),
            tables: TableNames::default(),
            store: StoreKind::default(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `DEALSHEET_API_BIND`: Listen host (default: 0.0.0.0)
    /// - `PORT` or `DEALSHEET_API_PORT`: Listen port (default: 3000)
    /// - `DEALSHEET_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `DEALSHEET_STORE`: `sheets` or `memory` (default: sheets)
    /// - `DEALSHEET_DEALS_TABLE`, `DEALSHEET_ACCOUNTS_TABLE`,
    ///   `DEALSHEET_QUOTES_TABLE`, `DEALSHEET_QUOTE_ITEMS_TABLE`: tab names
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`], reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("DEALSHEET_API_BIND").unwrap_or_else(|| "0.0.0.0".to_string());
        let port_str = lookup("PORT")
            .or_else(|| lookup("DEALSHEET_API_PORT"))
            .unwrap_or_else(|| "3000".to_string());
        let port = port_str
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port_str.clone()))?;
        let address = format!("{}:{}", host.trim(), port);
        let bind_addr = address
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddress {
                address: address.clone(),
                reason: e.to_string(),
            })?;

        let cors_origins = lookup("DEALSHEET_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let store = match lookup("DEALSHEET_STORE") {
            Some(s) if !s.trim().is_empty() => s.parse()?,
            _ => StoreKind::default(),
        };

        let defaults = TableNames::default();
        let table = |key: &str, default: String| lookup(key).map(|s| s.trim().to_string()).unwrap_or(default);
        let tables = TableNames {
            deals: table("DEALSHEET_DEALS_TABLE", defaults.deals),
            accounts: table("DEALSHEET_ACCOUNTS_TABLE", defaults.accounts),
            quotes: table("DEALSHEET_QUOTES_TABLE", defaults.quotes),
            quote_items: table("DEALSHEET_QUOTE_ITEMS_TABLE", defaults.quote_items),
        };

        let config = Self {
            bind_addr,
            cors_origins,
            tables,
            store,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (label, name) in [
            ("deals", &self.tables.deals),
            ("accounts", &self.tables.accounts),
            ("quotes", &self.tables.quotes),
            ("quote items", &self.tables.quote_items),
        ] {
            if name.is_empty() {
                return Err(ConfigError::EmptyTableName(label));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.store, StoreKind::Sheets);
        assert_eq!(config.tables, TableNames::default());
    }

    #[test]
    fn test_port_prefers_port_over_api_port() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DEALSHEET_API_PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_invalid_port() {
        let err = ApiConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("eighty".to_string()));
    }

    #[test]
    fn test_cors_and_tables() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("DEALSHEET_CORS_ORIGINS", "https://crm.example, ,https://app.example"),
            ("DEALSHEET_DEALS_TABLE", "Pipeline"),
            ("DEALSHEET_STORE", "memory"),
        ]))
        .unwrap();
        assert_eq!(config.cors_origins, vec!["https://crm.example", "https://app.example"]);
        assert_eq!(config.tables.deals, "Pipeline");
        assert_eq!(config.tables.accounts, "Accounts");
        assert_eq!(config.store, StoreKind::Memory);
    }

    #[test]
    fn test_unknown_store_and_empty_table() {
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[("DEALSHEET_STORE", "postgres")])),
            Err(ConfigError::UnknownStore(_))
        ));
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[("DEALSHEET_QUOTES_TABLE", "  ")])).unwrap_err(),
            ConfigError::EmptyTableName("quotes")
        );
    }
}
