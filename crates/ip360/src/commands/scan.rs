//! `ip360 scan` handler.

use ip360_core::{ScanOutcome, ScanRequest};

use crate::cli::{GlobalOpts, ScanArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: ScanArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let request = build_request(&args, cfg, global)?;
    let appliance = config::resolve_appliance(global, cfg, args.start_timeout)?;

    tracing::debug!(
        device_profiler = %request.device_profiler,
        scan_profile = %request.scan_profile,
        network = %request.network,
        "starting scan"
    );
    let outcome = ip360_core::run_scan(&appliance, &request).await?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &outcome,
        |o| output::scan_detail(o, color),
        |o: &ScanOutcome| o.scan.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Merge scan flags with the active profile's default entity names.
fn build_request(
    args: &ScanArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ScanRequest, CliError> {
    let profile = cfg.profiles.get(&config::active_profile_name(global, cfg));

    let pick = |flag: Option<&String>,
                default: Option<&String>,
                field: &str|
     -> Result<String, CliError> {
        flag.or(default)
            .filter(|name| !name.is_empty())
            .cloned()
            .ok_or_else(|| CliError::Validation {
                field: field.into(),
                reason: format!("pass --{field} or set it on the profile"),
            })
    };

    let device_profiler = pick(
        args.device_profiler.as_ref(),
        profile.and_then(|p| p.device_profiler.as_ref()),
        "device-profiler",
    )?;
    let scan_profile = pick(
        args.scan_profile.as_ref(),
        profile.and_then(|p| p.scan_profile.as_ref()),
        "scan-profile",
    )?;
    let network = pick(
        args.network.as_ref(),
        profile.and_then(|p| p.network.as_ref()),
        "network",
    )?;

    let mut request = ScanRequest::new(device_profiler, scan_profile, network);
    if let Some(ref range) = args.range {
        request = request.with_range(range.clone());
    }
    if args.wait_for_start {
        request.wait_for_start = Some(true);
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::Parser;

    use crate::cli::{Cli, Command};
    use crate::config::Profile;

    use super::*;

    fn parse(argv: &[&str]) -> (ScanArgs, GlobalOpts) {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Scan(args) => (args, cli.global),
            other => panic!("expected scan, got {other:?}"),
        }
    }

    fn config_with_defaults() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_url: "https://ip360.example/api2xmlrpc".into(),
                device_profiler: Some("DP-East".into()),
                scan_profile: Some("Full Audit".into()),
                network: Some("Corp".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile_defaults() {
        let (args, global) = parse(&["ip360", "scan", "-n", "Lab", "-r", "10.1.0.0/16"]);
        let request = build_request(&args, &config_with_defaults(), &global).unwrap();
        assert_eq!(request.device_profiler, "DP-East");
        assert_eq!(request.scan_profile, "Full Audit");
        assert_eq!(request.network, "Lab");
        assert_eq!(request.range.as_deref(), Some("10.1.0.0/16"));
        assert_eq!(request.wait_for_start, None);
    }

    #[test]
    fn missing_entity_name_is_a_usage_error() {
        let (args, global) = parse(&["ip360", "scan", "-d", "DP", "-s", "SP"]);
        let err = build_request(&args, &Config::default(), &global).unwrap_err();
        assert!(
            matches!(err, CliError::Validation { ref field, .. } if field == "network"),
            "{err:?}"
        );
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }
}
