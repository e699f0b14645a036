// ── Domain types ──

use serde::Serialize;

use ip360_api::{EntityClass, Value};

/// A resolved server-side object.
///
/// The identifier is opaque. Non-string search results (the appliance
/// occasionally returns bare integers) are kept in their textual form, so
/// the call target and the `scanProfile` and `network` members of
/// `startScan` all carry string ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: EntityClass,
    pub id: String,
}

impl EntityRef {
    pub fn from_value(kind: EntityClass, value: &Value) -> Self {
        Self {
            kind,
            id: value.to_string(),
        }
    }
}

/// Result of a successful scan invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    /// Always `true`: starting a scan changes appliance state.
    pub changed: bool,
    /// Scan handle returned by `startScan`, unmodified.
    pub scan: Value,
    pub device_profiler: String,
    pub scan_profile: String,
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}
