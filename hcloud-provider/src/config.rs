//! Provider API client configuration.

use std::time::Duration;

/// Public Hetzner Cloud API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.hetzner.cloud/v1";

/// Environment variable the binary reads the API token from by default.
pub const DEFAULT_TOKEN_ENV: &str = "HCLOUD_TOKEN";

/// Settings for the HTTP client that talks to the provider API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the API version, without trailing slash.
    pub endpoint: String,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("hcloud-provider/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join the endpoint with a relative API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
