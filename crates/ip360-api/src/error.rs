use thiserror::Error;

/// Top-level error type for the `ip360-api` crate.
///
/// Covers every failure mode of an XML-RPC exchange with the appliance:
/// transport, HTTP-level protocol errors, server faults, and malformed
/// replies. `ip360-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── XML-RPC ─────────────────────────────────────────────────────
    /// The server answered with a non-200 HTTP status.
    #[error("xmlrpc protocol error: {status} {message}")]
    Protocol { status: u16, message: String },

    /// The server answered the call with an XML-RPC fault.
    #[error("xmlrpc fault: {code} {message}")]
    Fault { code: i64, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The body could not be parsed as an XML-RPC document.
    #[error("Malformed XML-RPC document: {0}")]
    Codec(String),

    /// The reply parsed, but its shape is not what the method returns.
    #[error("Unexpected response to {method}: {message}")]
    UnexpectedResponse { method: String, message: String },
}

impl Error {
    /// The fault code, if this error is an XML-RPC fault.
    pub fn fault_code(&self) -> Option<i64> {
        match self {
            Self::Fault { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Codec(err.to_string())
    }
}
