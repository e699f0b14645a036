//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Lists use `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use ip360_core::ScanOutcome;

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item detail views don't
/// use the `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Domain views ─────────────────────────────────────────────────────

/// Key/value summary of a started scan.
pub fn scan_detail(outcome: &ScanOutcome, color: bool) -> String {
    let mut lines = Vec::with_capacity(6);
    let headline = "Scan started";
    if color {
        lines.push(format!("{}", headline.green().bold()));
    } else {
        lines.push(headline.to_owned());
    }

    let mut fields = vec![
        ("Scan", outcome.scan.to_string()),
        ("Device Profiler", outcome.device_profiler.clone()),
        ("Scan Profile", outcome.scan_profile.clone()),
        ("Network", outcome.network.clone()),
    ];
    if let Some(ref range) = outcome.range {
        fields.push(("Range", range.clone()));
    }

    for (label, value) in fields {
        let label = format!("{label:<16}");
        if color {
            lines.push(format!("  {} {value}", label.dimmed()));
        } else {
            lines.push(format!("  {label} {value}"));
        }
    }
    lines.join("\n")
}

/// One row of `ip360 search` output.
#[derive(Tabled)]
pub struct MatchRow {
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "ID")]
    pub id: String,
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        render_json_compact(data)
    } else {
        render_json_pretty(data)
    }
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: {e}\n"))
}

#[cfg(test)]
mod tests {
    use ip360_core::Value;

    use super::*;

    fn outcome(range: Option<&str>) -> ScanOutcome {
        ScanOutcome {
            changed: true,
            scan: Value::from("scan-42"),
            device_profiler: "dp1".into(),
            scan_profile: "sp1".into(),
            network: "net1".into(),
            range: range.map(Into::into),
        }
    }

    #[test]
    fn plain_scan_output_is_the_handle() {
        let out = render_single(
            &OutputFormat::Plain,
            &outcome(None),
            |o| scan_detail(o, false),
            |o| o.scan.to_string(),
        );
        assert_eq!(out, "scan-42");
    }

    #[test]
    fn compact_json_skips_missing_range() {
        let out = render_single(
            &OutputFormat::JsonCompact,
            &outcome(None),
            |o| scan_detail(o, false),
            |o| o.scan.to_string(),
        );
        assert_eq!(
            out,
            r#"{"changed":true,"scan":"scan-42","device_profiler":"dp1","scan_profile":"sp1","network":"net1"}"#
        );
    }

    #[test]
    fn detail_lists_range_when_present() {
        let text = scan_detail(&outcome(Some("10.0.0.0/24")), false);
        assert!(text.starts_with("Scan started"));
        assert!(text.contains("Range"));
        assert!(text.contains("10.0.0.0/24"));
        assert!(!scan_detail(&outcome(None), false).contains("Range"));
    }

    #[test]
    fn plain_list_is_one_id_per_line() {
        let ids = vec!["net1".to_owned(), "net2".to_owned()];
        let out = render_list(
            &OutputFormat::Plain,
            &ids,
            |id| MatchRow {
                kind: "Network".into(),
                id: id.clone(),
            },
            Clone::clone,
        );
        assert_eq!(out, "net1\nnet2");
    }
}
