// ── Scan workflow ──
//
// login -> resolve Device Profiler -> resolve Scan Profile -> resolve
// Network -> startScan -> logout. Strictly sequential; the first failure
// ends the run.

use tracing::{debug, info};

use ip360_api::{EntityClass, ScanParams};

use crate::config::{ApplianceConfig, ScanRequest};
use crate::error::CoreError;
use crate::model::ScanOutcome;
use crate::session::Session;

/// Run the whole scan workflow against one appliance.
pub async fn run_scan(
    config: &ApplianceConfig,
    request: &ScanRequest,
) -> Result<ScanOutcome, CoreError> {
    if request.wait_for_start.is_some() {
        debug!("wait_for_start is accepted but not acted on");
    }
    Session::scoped(config, async |session| start_scan(session, request).await).await
}

/// Resolve the request's entities and start the scan inside an open session.
pub async fn start_scan(
    session: &Session,
    request: &ScanRequest,
) -> Result<ScanOutcome, CoreError> {
    let device_profiler = session
        .resolve(EntityClass::DeviceProfiler, &request.device_profiler)
        .await?;
    let scan_profile = session
        .resolve(EntityClass::ScanProfile, &request.scan_profile)
        .await?;
    let network = session
        .resolve(EntityClass::Network, &request.network)
        .await?;

    let params = ScanParams {
        scan_profile: scan_profile.id,
        network: network.id,
        range: request.range.clone(),
    };
    let scan = session.start_scan(&device_profiler, &params).await?;
    info!(device_profiler = %device_profiler.id, %scan, "scan started");

    Ok(ScanOutcome {
        changed: true,
        scan,
        device_profiler: device_profiler.id,
        scan_profile: params.scan_profile,
        network: params.network,
        range: params.range,
    })
}
