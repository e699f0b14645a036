// Scan start
//
// `startScan` is an instance method on a Device Profiler object:
// `call(session, "<dp id>", "startScan", {scanProfile, network, range})`.

use tracing::debug;

use crate::auth::SessionToken;
use crate::client::Ip360Client;
use crate::error::Error;
use crate::xmlrpc::Value;

/// Parameters of an on-demand scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanParams {
    /// Scan Profile object identifier.
    pub scan_profile: String,
    /// Network object identifier.
    pub network: String,
    /// Target range within the network; the appliance scans the whole
    /// network when absent.
    pub range: Option<String>,
}

impl ScanParams {
    /// The `startScan` argument struct. `range` is omitted rather than sent
    /// as nil when unset.
    pub fn to_value(&self) -> Value {
        let mut members = vec![
            ("scanProfile", Value::from(self.scan_profile.as_str())),
            ("network", Value::from(self.network.as_str())),
        ];
        if let Some(ref range) = self.range {
            members.push(("range", Value::from(range.as_str())));
        }
        Value::structure(members)
    }
}

impl Ip360Client {
    /// Start a scan on the given Device Profiler, returning the appliance's
    /// scan handle untouched.
    pub async fn start_scan(
        &self,
        session: &SessionToken,
        device_profiler: &str,
        params: &ScanParams,
    ) -> Result<Value, Error> {
        debug!(
            device_profiler,
            scan_profile = %params.scan_profile,
            network = %params.network,
            range = ?params.range,
            "starting scan"
        );
        self.call(session, device_profiler, "startScan", params.to_value())
            .await
    }
}
