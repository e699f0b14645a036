// ip360-core: session handling and the scan workflow between ip360-api and the CLI.

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod workflow;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ApplianceConfig, DEFAULT_TIMEOUT_SECS, ScanRequest, TlsVerification};
pub use error::CoreError;
pub use model::{EntityRef, ScanOutcome};
pub use session::Session;
pub use workflow::{run_scan, start_scan};

pub use ip360_api::{EntityClass, Value};
