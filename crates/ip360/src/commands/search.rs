//! `ip360 search` handler.

use ip360_core::{EntityClass, Session, Value};

use crate::cli::{EntityKind, GlobalOpts, SearchArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, MatchRow};

impl From<EntityKind> for EntityClass {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::DeviceProfiler => EntityClass::DeviceProfiler,
            EntityKind::ScanProfile => EntityClass::ScanProfile,
            EntityKind::Network => EntityClass::Network,
        }
    }
}

pub async fn handle(args: SearchArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let appliance = config::resolve_appliance(global, cfg, None)?;
    let kind = EntityClass::from(args.kind);
    let name = args.name;

    let matches: Vec<Value> = Session::scoped(&appliance, async |session| {
        session.search(kind, &name).await
    })
    .await?;

    if matches.is_empty() {
        if !global.quiet {
            eprintln!("No {kind} named '{name}'");
        }
        return Ok(());
    }

    let label = kind.to_string();
    let out = output::render_list(
        &global.output,
        &matches,
        |id| MatchRow {
            kind: label.clone(),
            id: id.to_string(),
        },
        ToString::to_string,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
