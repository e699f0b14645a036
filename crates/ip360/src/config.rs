//! CLI configuration: thin wrapper around `ip360_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --username, etc.).

use std::time::Duration;

use secrecy::SecretString;

use ip360_core::{ApplianceConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ip360_config::{
    Config, Defaults, Profile, config_path, load_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for diagnostics.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build an `ApplianceConfig` from the config file, profile, and CLI overrides.
///
/// `timeout_override` comes from per-command flags such as `--start-timeout`
/// and wins over `--timeout`.
pub fn resolve_appliance(
    global: &GlobalOpts,
    cfg: &Config,
    timeout_override: Option<u64>,
) -> Result<ApplianceConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let profile = cfg.profiles.get(&profile_name);

    // An explicitly requested profile must exist.
    if profile.is_none() && global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    }

    // 1. Endpoint URL (flag > env > profile)
    let url_str = global
        .api_url
        .as_deref()
        .or(profile.map(|p| p.api_url.as_str()))
        .filter(|u| !u.is_empty())
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
    let url = ip360_config::parse_url("api_url", url_str)?;

    // 2. Credentials (flag > env > profile chain)
    let username = match (&global.username, profile) {
        (Some(user), _) => user.clone(),
        (None, Some(p)) => ip360_config::resolve_username(p, &profile_name)?,
        (None, None) => {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
    };
    let password = match (&global.password, profile) {
        (Some(pw), _) => SecretString::from(pw.clone()),
        (None, Some(p)) => ip360_config::resolve_password(p, &profile_name)?,
        (None, None) => {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
    };

    // 3. TLS verification
    let insecure = global.insecure
        || profile
            .and_then(|p| p.insecure)
            .unwrap_or(cfg.defaults.insecure);
    let tls = if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.clone()) {
        TlsVerification::CustomCa(ca_path)
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Timeout (command flag > global flag > profile > defaults)
    let timeout_secs = timeout_override
        .or(global.timeout)
        .or(profile.and_then(|p| p.timeout))
        .unwrap_or(cfg.defaults.timeout);

    Ok(ApplianceConfig {
        url,
        username,
        password,
        tls,
        timeout: Duration::from_secs(timeout_secs),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn globals() -> GlobalOpts {
        // Clear anything clap picked up from IP360_* variables.
        let mut global = Cli::try_parse_from(["ip360", "search", "network", "Corp"])
            .unwrap()
            .global;
        global.profile = None;
        global.api_url = None;
        global.username = None;
        global.password = Some("from-flag".into());
        global.insecure = false;
        global.timeout = None;
        global
    }

    fn lab_config() -> Config {
        let mut cfg = Config {
            default_profile: Some("lab".into()),
            defaults: Defaults {
                timeout: 20,
                ..Defaults::default()
            },
            ..Config::default()
        };
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                api_url: "https://ip360.lab/api2xmlrpc".into(),
                username: Some("scanner".into()),
                insecure: Some(true),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn profile_becomes_appliance_config() {
        let appliance = resolve_appliance(&globals(), &lab_config(), None).unwrap();
        assert_eq!(appliance.url.as_str(), "https://ip360.lab/api2xmlrpc");
        assert_eq!(appliance.username, "scanner");
        assert_eq!(appliance.password.expose_secret(), "from-flag");
        assert_eq!(appliance.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(appliance.timeout, Duration::from_secs(20));
    }

    #[test]
    fn flags_win_over_profile() {
        let mut cfg = lab_config();
        cfg.profiles.get_mut("lab").unwrap().timeout = Some(40);
        let mut global = globals();
        global.api_url = Some("https://other.example/api2xmlrpc".into());
        global.timeout = Some(5);

        let appliance = resolve_appliance(&global, &cfg, None).unwrap();
        assert_eq!(appliance.url.host_str(), Some("other.example"));
        assert_eq!(appliance.timeout, Duration::from_secs(5));

        let appliance = resolve_appliance(&global, &cfg, Some(90)).unwrap();
        assert_eq!(appliance.timeout, Duration::from_secs(90));
    }

    #[test]
    fn profile_timeout_beats_defaults() {
        let mut cfg = lab_config();
        cfg.profiles.get_mut("lab").unwrap().timeout = Some(40);
        let appliance = resolve_appliance(&globals(), &cfg, None).unwrap();
        assert_eq!(appliance.timeout, Duration::from_secs(40));
    }

    #[test]
    fn custom_ca_when_verification_stays_on() {
        let mut cfg = lab_config();
        let lab = cfg.profiles.get_mut("lab").unwrap();
        lab.insecure = None;
        lab.ca_cert = Some("/etc/ip360/ca.pem".into());
        let appliance = resolve_appliance(&globals(), &cfg, None).unwrap();
        assert_eq!(
            appliance.tls,
            TlsVerification::CustomCa("/etc/ip360/ca.pem".into())
        );
    }

    #[test]
    fn invalid_profile_url_is_a_validation_error() {
        let mut cfg = lab_config();
        cfg.profiles.get_mut("lab").unwrap().api_url = "not a url".into();
        let err = resolve_appliance(&globals(), &cfg, None).unwrap_err();
        assert!(
            matches!(err, CliError::Validation { ref field, .. } if field == "api_url"),
            "{err:?}"
        );
    }

    #[test]
    fn explicit_missing_profile_is_reported() {
        let mut global = globals();
        global.profile = Some("prod".into());
        let err = resolve_appliance(&global, &lab_config(), None).unwrap_err();
        assert!(
            matches!(err, CliError::ProfileNotFound { ref name, ref available }
                if name == "prod" && available == "lab"),
            "{err:?}"
        );
    }
}
