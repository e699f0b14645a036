//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ip360_config::ConfigError;
use ip360_core::{CoreError, EntityClass};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to appliance at {url}: {reason}")]
    #[diagnostic(
        code(ip360::connection_failed),
        help(
            "Check that the appliance is reachable and the URL points at the XML-RPC endpoint.\n\
             Self-signed certificate? Retry with --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(ip360::timeout),
        help("Increase the timeout with --timeout or --start-timeout.")
    )]
    Timeout { url: String },

    #[error("{message}")]
    #[diagnostic(code(ip360::protocol_error))]
    Protocol { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ip360::auth_failed),
        help(
            "Verify the username and password.\n\
             Store a new password with: ip360 config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(ip360::no_credentials),
        help(
            "Configure credentials with: ip360 config init\n\
             Or set IP360_USERNAME and IP360_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resolution ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(ip360::not_found),
        help("Names must match exactly. Run: ip360 search {search_kind} <name>")
    )]
    NotFound {
        message: String,
        search_kind: &'static str,
    },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(ip360::fault),
        help("The appliance rejected the call (fault code {code}).")
    )]
    RemoteFault { code: i64, message: String },

    #[error("Invalid response from appliance: {message}")]
    #[diagnostic(code(ip360::invalid_response))]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ip360::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ip360::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ip360 config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No appliance configured")]
    #[diagnostic(
        code(ip360::no_config),
        help(
            "Create a profile with: ip360 config init\n\
             Or pass --api-url / set IP360_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ip360::config))]
    Config(Box<figment::Error>),

    // ── Module mode ──────────────────────────────────────────────────
    /// Already reported as JSON on stdout; carries the exit status only.
    #[error("{msg}")]
    #[diagnostic(code(ip360::module_failed))]
    ModuleFailed { msg: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(ip360::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Protocol { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::RemoteFault { .. } => exit_code::REJECTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

/// `ip360 search` kind argument for an entity class, for help text.
fn search_kind(kind: EntityClass) -> &'static str {
    match kind {
        EntityClass::DeviceProfiler => "device-profiler",
        EntityClass::ScanProfile => "scan-profile",
        EntityClass::Network => "network",
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout { url } => CliError::Timeout { url },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NotFound { kind, .. } => CliError::NotFound {
                message,
                search_kind: search_kind(kind),
            },
            CoreError::RemoteFault { code, .. } => CliError::RemoteFault { code, message },
            CoreError::Protocol { .. } => CliError::Protocol { message },
            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_exit_codes() {
        let timeout = CliError::from(CoreError::Timeout {
            url: "https://ip360.lab/api2xmlrpc".into(),
        });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let not_found = CliError::from(CoreError::NotFound {
            kind: EntityClass::Network,
            query: "name = 'Corp'".into(),
        });
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let refused = CliError::from(CoreError::ConnectionFailed {
            url: "https://ip360.lab/api2xmlrpc".into(),
            reason: "connection refused".into(),
        });
        assert_eq!(refused.exit_code(), exit_code::CONNECTION);
    }
}
