use clap::ValueEnum;
use comfy_table::{Cell, Table};
use media_sync_core::{Outcome, ReconcileSummary};
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "success",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors should always be shown, even in quiet mode
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", "✗".red(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "error",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                eprintln!("{}", msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "info",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", "⚠".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "warning",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    /// One line per outcome, printed as soon as it is known
    pub fn outcome(&self, outcome: &Outcome) {
        match self.format {
            OutputFormat::Human => match outcome {
                Outcome::Failed { .. } => eprintln!("{}", outcome_line(outcome).red()),
                _ if self.quiet => {}
                _ => println!("{}", outcome_line(outcome)),
            },
            OutputFormat::Json | OutputFormat::JsonPretty => {
                if self.quiet && !matches!(outcome, Outcome::Failed { .. }) {
                    return;
                }
                match serde_json::to_value(outcome) {
                    Ok(value) => self.print_json(&value),
                    Err(e) => tracing::warn!("Failed to serialize outcome: {}", e),
                }
            }
        }
    }

    pub fn summary(&self, summary: &ReconcileSummary, remote_lookups: usize, dropped_rows: usize) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                let mut table = Table::new();
                table.set_header(vec![
                    Cell::new("Result").add_attribute(comfy_table::Attribute::Bold),
                    Cell::new("Count").add_attribute(comfy_table::Attribute::Bold),
                ]);
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
                table.add_row(vec![Cell::new("New").fg(comfy_table::Color::Green), Cell::new(summary.written)]);
                table.add_row(vec![Cell::new("Old"), Cell::new(summary.skipped)]);
                table.add_row(vec![Cell::new("Not found").fg(comfy_table::Color::Yellow), Cell::new(summary.unresolved)]);
                table.add_row(vec![Cell::new("Failed").fg(comfy_table::Color::Red), Cell::new(summary.failed)]);
                table.add_row(vec![Cell::new("Malformed rows"), Cell::new(dropped_rows)]);
                table.add_row(vec![Cell::new("TMDB lookups"), Cell::new(remote_lookups)]);
                eprintln!("{table}");
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "summary",
                    "written": summary.written,
                    "skipped": summary.skipped,
                    "unresolved": summary.unresolved,
                    "failed": summary.failed,
                    "malformed_rows": dropped_rows,
                    "remote_lookups": remote_lookups,
                }));
            }
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }
}

/// Human-readable line for an outcome
pub fn outcome_line(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Written { record, collection, .. } => format!("New {}: {}", collection, record.title),
        Outcome::Skipped { record, collection, .. } => format!("Old {}: {}", collection, record.title),
        Outcome::Unresolved { record, .. } => format!(
            "Couldn't find '{}' {} {}",
            record.title,
            record.title_type,
            record.url.as_deref().unwrap_or_default()
        ),
        Outcome::Failed { record, collection, cause } => {
            format!("Failed {}: {} ({})", collection, record.title, cause)
        }
    }
}
