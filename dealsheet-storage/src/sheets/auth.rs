//! Service-account OAuth for the Sheets API.
//!
//! A signed RS256 assertion is exchanged at the token endpoint for a bearer
//! token, which is reused until shortly before it expires.

use chrono::Utc;
use dealsheet_core::{StoreError, StoreResult};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::config::{SheetsConfig, SHEETS_SCOPE};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion.
const ASSERTION_TTL_SECS: i64 = 3600;

/// Tokens are refreshed this long before Google says they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Claims of the service-account assertion.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(client_email: &str, token_uri: &str, now: i64) -> Self {
        Self {
            iss: client_email.to_string(),
            scope: SHEETS_SCOPE.to_string(),
            aud: token_uri.to_string(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_TTL_SECS as u64
}

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// Bearer token source for one service account.
pub struct ServiceAccountAuth {
    client_email: String,
    token_uri: String,
    key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountAuth {
    /// Parse the private key up front so a bad key fails at startup.
    pub fn new(config: &SheetsConfig) -> StoreResult<Self> {
        let key = EncodingKey::from_rsa_pem(config.private_key.expose_secret().as_bytes())
            .map_err(|e| StoreError::configuration("GOOGLE_SHEETS_PRIVATE_KEY", e.to_string()))?;
        Ok(Self {
            client_email: config.client_email.clone(),
            token_uri: config.token_uri.clone(),
            key,
            cached: Mutex::new(None),
        })
    }

    /// Signed assertion for the current time.
    pub fn assertion(&self) -> StoreResult<String> {
        let claims = AssertionClaims::new(&self.client_email, &self.token_uri, Utc::now().timestamp());
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| StoreError::transport("sign_assertion", e.to_string()))
    }

    /// A valid bearer token, fetching a fresh one when the cached token is
    /// missing or about to expire.
    pub async fn bearer_token(&self, http: &reqwest::Client) -> StoreResult<SecretString> {
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref() {
            if Instant::now() < entry.refresh_at {
                return Ok(copy_secret(&entry.token));
            }
        }

        let assertion = self.assertion()?;
        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::transport("fetch_token", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Token exchange rejected");
            return Err(StoreError::transport(
                "fetch_token",
                format!("HTTP {}: {}", status.as_u16(), body),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::transport("fetch_token", e.to_string()))?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(REFRESH_MARGIN);
        let secret = SecretString::new(token.access_token.into());
        let handed_out = copy_secret(&secret);
        *cached = Some(CachedToken {
            token: secret,
            refresh_at: Instant::now() + lifetime,
        });
        tracing::debug!(expires_in = token.expires_in, "Fetched Sheets access token");
        Ok(handed_out)
    }

    /// Drop the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::new(secret.expose_secret().into())
}

/// `Authorization` header value for `token`.
pub(crate) fn bearer_header(token: &SecretString) -> String {
    format!("Bearer {}", token.expose_secret())
}
