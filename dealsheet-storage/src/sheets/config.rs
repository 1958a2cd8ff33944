//! Google Sheets connection settings.

use dealsheet_core::{StoreError, StoreResult};
use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Credentials and endpoints for one spreadsheet.
pub struct SheetsConfig {
    /// Service account email (`...@....iam.gserviceaccount.com`).
    pub client_email: String,
    /// PEM-encoded RSA private key of the service account.
    pub private_key: SecretString,
    pub spreadsheet_id: String,
    pub api_base: String,
    pub token_uri: String,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("api_base", &self.api_base)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl SheetsConfig {
    /// Load settings from environment variables.
    ///
    /// Environment variables:
    /// - `GOOGLE_SHEETS_CLIENT_EMAIL`: service account email (required)
    /// - `GOOGLE_SHEETS_PRIVATE_KEY`: PEM private key; literal `\n` sequences
    ///   are turned into newlines (required)
    /// - `GOOGLE_SHEETS_SPREADSHEET_ID`: target spreadsheet (required)
    /// - `GOOGLE_SHEETS_API_BASE`: API origin (default: Google)
    /// - `GOOGLE_SHEETS_TOKEN_URI`: OAuth token endpoint (default: Google)
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config = Self {
            client_email: get("GOOGLE_SHEETS_CLIENT_EMAIL").unwrap_or_default(),
            private_key: SecretString::new(
                get("GOOGLE_SHEETS_PRIVATE_KEY")
                    .map(|key| key.replace("\\n", "\n"))
                    .unwrap_or_default()
                    .into(),
            ),
            spreadsheet_id: get("GOOGLE_SHEETS_SPREADSHEET_ID").unwrap_or_default(),
            api_base: get("GOOGLE_SHEETS_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            token_uri: get("GOOGLE_SHEETS_TOKEN_URI")
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot possibly reach the spreadsheet.
    pub fn validate(&self) -> StoreResult<()> {
        if self.client_email.is_empty() {
            return Err(StoreError::configuration(
                "GOOGLE_SHEETS_CLIENT_EMAIL",
                "not set",
            ));
        }
        let key = self.private_key.expose_secret();
        if key.is_empty() {
            return Err(StoreError::configuration(
                "GOOGLE_SHEETS_PRIVATE_KEY",
                "not set",
            ));
        }
        if !key.contains("PRIVATE KEY") {
            return Err(StoreError::configuration(
                "GOOGLE_SHEETS_PRIVATE_KEY",
                "not a PEM private key",
            ));
        }
        if self.spreadsheet_id.is_empty() {
            return Err(StoreError::configuration(
                "GOOGLE_SHEETS_SPREADSHEET_ID",
                "not set",
            ));
        }
        for (field, url) in [
            ("GOOGLE_SHEETS_API_BASE", &self.api_base),
            ("GOOGLE_SHEETS_TOKEN_URI", &self.token_uri),
        ] {
            if reqwest::Url::parse(url).is_err() {
                return Err(StoreError::configuration(field, "not a valid URL"));
            }
        }
        Ok(())
    }
}
