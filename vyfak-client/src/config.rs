//! Provider configuration

use crate::{ClientError, ClientResult};
use reqwest::Url;

/// Production API endpoint
pub const DEFAULT_ENDPOINT_URL: &str = "https://api.vyfakturuj.cz/2.0/";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and endpoint for the invoicing API
#[derive(Clone)]
pub struct ProviderConfig {
    /// Account login (email)
    pub login: String,

    /// API secret key
    pub api_key: String,

    /// Base URL, every resource path is appended to it
    pub endpoint_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ProviderConfig {
    /// Create a configuration for the production endpoint
    pub fn new(login: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            api_key: api_key.into(),
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the endpoint URL (validated when the client is built)
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Both login and key are present
    pub fn is_configured(&self) -> bool {
        !self.login.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Masked key for display, first 10 characters only
    pub fn masked_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(10).collect();
        format!("{}...", prefix)
    }

    /// Create an API client from this configuration
    pub fn build_client(&self) -> ClientResult<super::VyfakClient> {
        super::VyfakClient::new(self)
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("login", &self.login)
            .field("api_key", &self.masked_key())
            .field("endpoint_url", &self.endpoint_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Validate an endpoint URL and normalize it to end with `/`
pub fn normalize_endpoint(url: &str) -> ClientResult<String> {
    let parsed = Url::parse(url)
        .map_err(|e| ClientError::Validation(format!("Invalid endpoint URL '{}': {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ClientError::Validation(format!(
            "Invalid endpoint URL '{}': expected http(s) with a host",
            url
        )));
    }

    let mut normalized = parsed.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}
