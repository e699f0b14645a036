// ── Runtime connection configuration ──
//
// These types describe *how* to reach an appliance and *what* to scan.
// They carry credential data and connection tuning, but never touch disk.
// The CLI constructs them and hands them in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use ip360_api::TransportConfig;
pub use ip360_api::TlsVerification;

/// Configuration for talking to a single appliance.
#[derive(Debug, Clone)]
pub struct ApplianceConfig {
    /// XML-RPC endpoint (e.g., `https://ip360.example.com/api2xmlrpc`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApplianceConfig {
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig::new(self.tls.clone(), self.timeout)
    }
}

/// Default request timeout, also the default `start_timeout`.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What to scan: the three entity names plus an optional range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub device_profiler: String,
    pub scan_profile: String,
    pub network: String,
    pub range: Option<String>,
    /// Accepted for compatibility with existing playbooks; not acted on.
    pub wait_for_start: Option<bool>,
}

impl ScanRequest {
    pub fn new(
        device_profiler: impl Into<String>,
        scan_profile: impl Into<String>,
        network: impl Into<String>,
    ) -> Self {
        Self {
            device_profiler: device_profiler.into(),
            scan_profile: scan_profile.into(),
            network: network.into(),
            range: None,
            wait_for_start: None,
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }
}
