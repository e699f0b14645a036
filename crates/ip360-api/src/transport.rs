// HTTP client construction
//
// One reqwest::Client per appliance session. Appliances commonly ship with
// self-signed certificates, so TLS handling is configurable per profile.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// How the appliance's certificate is verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Trust an extra CA from this PEM file, on top of the system store.
    CustomCa(PathBuf),
    /// Skip verification entirely.
    DangerAcceptInvalid,
}

/// Settings for the HTTP client behind `Ip360Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsVerification,
    /// Whole-request timeout, connect through body.
    pub timeout: Duration,
}

impl TransportConfig {
    pub fn new(tls: TlsVerification, timeout: Duration) -> Self {
        Self { tls, timeout }
    }

    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("ip360/", env!("CARGO_PKG_VERSION")));

        let builder = match &self.tls {
            TlsVerification::SystemDefaults => builder,
            TlsVerification::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            TlsVerification::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("failed to read CA cert {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("invalid CA cert {}: {e}", path.display())))
}
