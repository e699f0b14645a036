//! `ip360 module` handler: automation-module mode.
//!
//! Reads the parameters from a JSON args file, runs the scan workflow and
//! prints exactly one JSON object on stdout: the scan outcome on success,
//! `{"failed": true, "msg": ...}` otherwise.

use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

use ip360_core::{ApplianceConfig, DEFAULT_TIMEOUT_SECS, ScanOutcome, ScanRequest, TlsVerification};

use crate::cli::{GlobalOpts, ModuleArgs};
use crate::error::CliError;
use crate::output;

/// Parameters accepted in the args file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ModuleParams {
    pub api_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub device_profiler: Option<String>,
    pub scan_profile: Option<String>,
    pub network: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub wait_for_start: Option<bool>,
    #[serde(default, deserialize_with = "loose_secs")]
    pub start_timeout: Option<u64>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub validate_certs: Option<bool>,
}

#[derive(Serialize)]
struct Failure<'a> {
    failed: bool,
    msg: &'a str,
}

pub async fn handle(args: ModuleArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match run(&args.args_file, global).await {
        Ok(outcome) => {
            println!("{}", output::render_json_compact(&outcome));
            Ok(())
        }
        Err(err) => {
            let msg = err.to_string();
            tracing::debug!(error = ?err, "module run failed");
            println!(
                "{}",
                output::render_json_compact(&Failure {
                    failed: true,
                    msg: &msg,
                })
            );
            Err(CliError::ModuleFailed { msg })
        }
    }
}

async fn run(path: &Path, global: &GlobalOpts) -> Result<ScanOutcome, CliError> {
    let raw = std::fs::read_to_string(path)?;
    let params: ModuleParams = serde_json::from_str(&raw)?;
    let (appliance, request) = params.into_parts(global)?;
    Ok(ip360_core::run_scan(&appliance, &request).await?)
}

impl ModuleParams {
    /// Validate the parameters and split them into connection and scan settings.
    ///
    /// Connection values absent from the file fall back to `IP360_URL`,
    /// `IP360_USERNAME` and `IP360_PASSWORD` through `GlobalOpts`.
    pub fn into_parts(self, global: &GlobalOpts) -> Result<(ApplianceConfig, ScanRequest), CliError> {
        let (username, password) = match (self.username, self.password) {
            (Some(u), Some(p)) => (Some(u), Some(p)),
            (None, None) => (global.username.clone(), global.password.clone()),
            _ => {
                return Err(CliError::Validation {
                    field: "username, password".into(),
                    reason: "parameters are required together".into(),
                });
            }
        };
        let api_url = self.api_url.or_else(|| global.api_url.clone());

        let mut missing = Vec::new();
        for (name, value) in [
            ("api_url", &api_url),
            ("username", &username),
            ("password", &password),
            ("device_profiler", &self.device_profiler),
            ("scan_profile", &self.scan_profile),
            ("network", &self.network),
        ] {
            if value.is_none() {
                missing.push(name);
            }
        }
        let (
            Some(api_url),
            Some(username),
            Some(password),
            Some(device_profiler),
            Some(scan_profile),
            Some(network),
        ) = (
            api_url,
            username,
            password,
            self.device_profiler,
            self.scan_profile,
            self.network,
        )
        else {
            return Err(CliError::Validation {
                field: missing.join(", "),
                reason: "missing required arguments".into(),
            });
        };

        let url = ip360_config::parse_url("api_url", &api_url)?;
        let tls = if self.validate_certs.unwrap_or(true) && !global.insecure {
            TlsVerification::SystemDefaults
        } else {
            TlsVerification::DangerAcceptInvalid
        };
        let mut appliance = ApplianceConfig::new(url, username, SecretString::from(password));
        appliance.tls = tls;
        appliance.timeout =
            Duration::from_secs(self.start_timeout.unwrap_or(DEFAULT_TIMEOUT_SECS));

        let mut request = ScanRequest::new(device_profiler, scan_profile, network);
        request.range = self.range.filter(|r| !r.is_empty());
        request.wait_for_start = self.wait_for_start;

        Ok((appliance, request))
    }
}

// ── Lenient scalar parsing ───────────────────────────────────────────
//
// Automation frameworks pass booleans and numbers as strings as often as
// not ("yes", "30").

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(u64),
    Str(String),
}

fn loose_bool<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    let Some(raw) = Option::<Loose>::deserialize(de)? else {
        return Ok(None);
    };
    match raw {
        Loose::Bool(b) => Ok(Some(b)),
        Loose::Int(0) => Ok(Some(false)),
        Loose::Int(1) => Ok(Some(true)),
        Loose::Str(s) => match s.to_ascii_lowercase().as_str() {
            "yes" | "on" | "true" | "1" | "y" => Ok(Some(true)),
            "no" | "off" | "false" | "0" | "n" => Ok(Some(false)),
            "" => Ok(None),
            other => Err(serde::de::Error::custom(format!(
                "'{other}' is not a valid boolean"
            ))),
        },
        Loose::Int(n) => Err(serde::de::Error::custom(format!(
            "{n} is not a valid boolean"
        ))),
    }
}

fn loose_secs<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u64>, D::Error> {
    match Option::<Loose>::deserialize(de)? {
        None => Ok(None),
        Some(Loose::Int(n)) => Ok(Some(n)),
        Some(Loose::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Loose::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("'{s}' is not a number of seconds"))),
        Some(Loose::Bool(b)) => Err(serde::de::Error::custom(format!(
            "{b} is not a number of seconds"
        ))),
    }
}
