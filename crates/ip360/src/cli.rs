//! Clap derive structures for the `ip360` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of workspace crates so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ip360 -- start on-demand scans on IP360 appliances
#[derive(Debug, Parser)]
#[command(
    name = "ip360",
    version,
    about = "Start vulnerability scans on IP360 appliances from the command line",
    long_about = "Drives an IP360 appliance through its XML-RPC management API.\n\n\
        Resolves a Device Profiler, Scan Profile and Network by name and starts\n\
        an on-demand scan. Also usable as an automation module (`ip360 module`).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "IP360_PROFILE", global = true)]
    pub profile: Option<String>,

    /// XML-RPC endpoint URL (overrides profile)
    #[arg(long, short = 'a', env = "IP360_URL", global = true)]
    pub api_url: Option<String>,

    /// API username (overrides profile)
    #[arg(long, short = 'u', env = "IP360_USERNAME", global = true)]
    pub username: Option<String>,

    /// API password (prefer the keyring: `ip360 config set-password`)
    #[arg(long, env = "IP360_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "IP360_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "IP360_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "IP360_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, identifiers only (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Entity kinds that can be searched by name.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityKind {
    /// Device Profilers (class.DP)
    #[value(alias = "dp")]
    DeviceProfiler,
    /// Scan Profiles (class.ScanProfile)
    #[value(alias = "sp")]
    ScanProfile,
    /// Networks (class.Network)
    #[value(alias = "net")]
    Network,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an on-demand scan
    Scan(ScanArgs),

    /// Look up objects by name
    #[command(alias = "find")]
    Search(SearchArgs),

    /// Run as an automation module: read parameters from a JSON file,
    /// print a JSON result
    Module(ModuleArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Scan ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Device Profiler name (falls back to the profile's device_profiler)
    #[arg(long, short = 'd')]
    pub device_profiler: Option<String>,

    /// Scan Profile name (falls back to the profile's scan_profile)
    #[arg(long, short = 's')]
    pub scan_profile: Option<String>,

    /// Network name (falls back to the profile's network)
    #[arg(long, short = 'n')]
    pub network: Option<String>,

    /// Address range within the network, e.g. 10.0.0.0/24
    #[arg(long, short = 'r')]
    pub range: Option<String>,

    /// Accepted for playbook compatibility; has no effect
    #[arg(long)]
    pub wait_for_start: bool,

    /// Seconds to wait for each appliance call (alias of --timeout)
    #[arg(long)]
    pub start_timeout: Option<u64>,
}

// ── Search ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// What to look up
    pub kind: EntityKind,

    /// Exact object name
    pub name: String,
}

// ── Module ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ModuleArgs {
    /// JSON file holding the module parameters
    pub args_file: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the current configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Set a key on the active profile
    Set {
        /// Profile key (api_url, username, password_env, insecure, timeout, ...)
        key: String,
        /// New value
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },

    /// Store the profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
