use crate::delivery::DeliveryPolicy;
use crate::workflow::WorkflowSettings;
use crate::{BridgeError, BridgeResult};
use shared::EmailShape;
use std::time::Duration;
use vyfak_client::{DEFAULT_ENDPOINT_URL, ProviderConfig, VyfakClient};

/// Bridge configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | VYFAKTURUJ_LOGIN | (empty) | API login |
/// | VYFAKTURUJ_API_KEY | (empty) | API secret key |
/// | VYFAKTURUJ_ENDPOINT | https://api.vyfakturuj.cz/2.0/ | API base URL |
/// | VYFAKTURUJ_TIMEOUT_SECS | 30 | Per-request timeout |
/// | SITE_NAME | Online Store | Shop name in invoice emails |
/// | DELIVERY_SHAPES | primary,secondary,minimal | Send-mail body shapes, in order |
/// | DELIVERY_PROBE | true | Test-send before the first attempt |
/// | DELIVERY_PAUSE_SECS | 3 | Pause between attempts |
/// | LOG_LEVEL | info | Log level |
/// | LOG_DIR | (unset) | Daily log files directory |
///
/// # Example
///
/// ```ignore
/// VYFAKTURUJ_LOGIN=shop@example.cz VYFAKTURUJ_API_KEY=... vyfak-check ping
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub provider: ProviderConfig,
    pub workflow: WorkflowSettings,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl BridgeConfig {
    /// Load configuration from the environment, defaults for anything unset
    pub fn from_env() -> Self {
        let provider = ProviderConfig::new(
            std::env::var("VYFAKTURUJ_LOGIN").unwrap_or_default(),
            std::env::var("VYFAKTURUJ_API_KEY").unwrap_or_default(),
        )
        .with_endpoint_url(
            std::env::var("VYFAKTURUJ_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT_URL.into()),
        )
        .with_timeout(
            std::env::var("VYFAKTURUJ_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(vyfak_client::config::DEFAULT_TIMEOUT_SECS),
        );

        let defaults = DeliveryPolicy::default();
        let delivery = DeliveryPolicy {
            shapes: std::env::var("DELIVERY_SHAPES")
                .ok()
                .and_then(|v| parse_shapes(&v))
                .unwrap_or(defaults.shapes),
            probe_first: std::env::var("DELIVERY_PROBE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.probe_first),
            probe_fallback: defaults.probe_fallback,
            pause: std::env::var("DELIVERY_PAUSE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.pause),
        };

        Self {
            provider,
            workflow: WorkflowSettings {
                site_name: std::env::var("SITE_NAME").unwrap_or_else(|_| "Online Store".into()),
                delivery,
            },
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    /// Build the API client; fails when credentials are missing
    pub fn connect(&self) -> BridgeResult<VyfakClient> {
        if !self.provider.is_configured() {
            return Err(BridgeError::NotConfigured);
        }
        Ok(self.provider.build_client()?)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Comma-separated shape names; `None` if any name is unknown or the list is empty
pub fn parse_shapes(value: &str) -> Option<Vec<EmailShape>> {
    let shapes: Result<Vec<EmailShape>, _> = value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect();

    match shapes {
        Ok(shapes) if !shapes.is_empty() => Some(shapes),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(value, error = %e, "Ignoring DELIVERY_SHAPES");
            None
        }
    }
}
