//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use ridedesk_core::BookingState;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Booking state label, colored by how much attention it needs.
pub fn state_label(state: BookingState, color: bool) -> String {
    let label = state.label();
    if !color {
        return label.to_owned();
    }
    match state {
        BookingState::CancelRequested => label.yellow().bold().to_string(),
        BookingState::CancelApproved | BookingState::Cancelled => label.red().to_string(),
        BookingState::CancelRejected | BookingState::Active => label.green().to_string(),
        BookingState::Completed => label.dimmed().to_string(),
    }
}

/// Account status label.
pub fn active_label(active: bool, color: bool) -> String {
    match (active, color) {
        (true, false) => "active".into(),
        (false, false) => "suspended".into(),
        (true, true) => "active".green().to_string(),
        (false, true) => "suspended".red().to_string(),
    }
}

// ── Value formatting ─────────────────────────────────────────────────

pub fn fmt_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

pub fn fmt_money(amount: Option<f64>) -> String {
    amount.map_or_else(|| "-".into(), |v| format!("{v:.2}"))
}

pub fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
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

/// Status line on stderr, suppressed by `--quiet`.
pub fn notice(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: &'static str,
        price: f64,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: "a", price: 1.5 },
            Item { id: "b", price: 2.0 },
        ]
    }

    fn row(i: &Item) -> ItemRow {
        ItemRow { id: i.id.into() }
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(&OutputFormat::Plain, &items(), row, |i| i.id.into()).unwrap();
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(&OutputFormat::JsonCompact, &items(), row, |i| i.id.into()).unwrap();
        assert_eq!(out, r#"[{"id":"a","price":1.5},{"id":"b","price":2.0}]"#);
    }

    #[test]
    fn table_uses_renamed_headers() {
        let out = render_list(&OutputFormat::Table, &items(), row, |i| i.id.into()).unwrap();
        assert!(out.contains("ID"));
        assert!(out.contains('a'));
    }

    #[test]
    fn labels_without_color_are_plain_text() {
        assert_eq!(
            state_label(BookingState::CancelRequested, false),
            "Cancellation requested"
        );
        assert_eq!(active_label(false, false), "suspended");
        assert_eq!(fmt_money(Some(40.0)), "40.00");
        assert_eq!(fmt_time(None), "-");
        assert_eq!(or_dash("  "), "-");
    }
}
