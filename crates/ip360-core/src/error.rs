// ── Core error types ──
//
// User-facing errors from ip360-core. The `From<ip360_api::Error>` impl
// translates wire-level failures into domain variants; faults and protocol
// errors keep their code and message verbatim.

use thiserror::Error;

use ip360_api::EntityClass;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to appliance at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Resolution errors ────────────────────────────────────────────
    #[error("{kind} not found: could not find {kind} with specified query ({query})")]
    NotFound { kind: EntityClass, query: String },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("xmlrpc fault: {code} {message}")]
    RemoteFault { code: i64, message: String },

    #[error("xmlrpc protocol error: {status} {message}")]
    Protocol { status: u16, message: String },

    #[error("Invalid response from appliance: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ip360_api::Error> for CoreError {
    fn from(err: ip360_api::Error) -> Self {
        match err {
            ip360_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                }
            }
            ip360_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ip360_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ip360_api::Error::Protocol { status, message } => {
                CoreError::Protocol { status, message }
            }
            ip360_api::Error::Fault { code, message } => CoreError::RemoteFault { code, message },
            ip360_api::Error::Codec(message) => CoreError::InvalidResponse { message },
            ip360_api::Error::UnexpectedResponse { method, message } => {
                CoreError::InvalidResponse {
                    message: format!("{method}: {message}"),
                }
            }
        }
    }
}
