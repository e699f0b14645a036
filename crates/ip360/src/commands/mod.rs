//! Command dispatch: bridges CLI args -> core workflow -> output formatting.

pub mod config_cmd;
pub mod module;
pub mod scan;
pub mod search;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch an appliance-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Scan(args) => scan::handle(args, cfg, global).await,
        Command::Search(args) => search::handle(args, cfg, global).await,
        // Handled before dispatch; they need no appliance settings
        Command::Module(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
