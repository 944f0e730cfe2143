use clap::ValueEnum;
use comfy_table::{Cell, CellAlignment, Color, Table};
use media_prune_core::report::{
    format_gap_days, format_hours, format_inactivity_days, format_optional_time, format_size_gib,
    format_top_users,
};
use media_prune_models::Report;
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

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "success",
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
                println!("{}", msg.as_ref());
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
                println!("{} {}", "⚠".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "warning",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
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

/// Rounded UTF-8 table, the style every human-readable table uses
pub fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(comfy_table::Attribute::Bold)
}

/// One row per flagged item, in report order
pub fn report_table(report: &Report) -> Table {
    let mut table = styled_table();
    table.set_header(
        [
            "Type", "Title", "Size GiB", "Added", "Last activity", "Gap days", "Inactive days",
            "Top users", "Hours", "Reason",
        ]
        .into_iter()
        .map(header_cell)
        .collect::<Vec<_>>(),
    );

    for item in &report.items {
        table.add_row(vec![
            Cell::new(item.kind.as_str()),
            Cell::new(&item.title),
            Cell::new(format_size_gib(item.size_bytes)).set_alignment(CellAlignment::Right),
            Cell::new(short_date(&format_optional_time(item.added_at))),
            Cell::new(short_date(&format_optional_time(item.last_activity_at))),
            Cell::new(format_gap_days(item, report.generated_at)).set_alignment(CellAlignment::Right),
            Cell::new(format_inactivity_days(item, report.generated_at))
                .set_alignment(CellAlignment::Right),
            Cell::new(format_top_users(&item.top_users, item.top_users_total_hours)),
            Cell::new(format_hours(item.total_watch_hours)).set_alignment(CellAlignment::Right),
            Cell::new(item.reason.as_str()),
        ]);
    }

    table
}

// The table only has room for the calendar date
fn short_date(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use media_prune_models::{MediaKind, Reason, ReportItem};

    #[test]
    fn test_short_date() {
        assert_eq!(short_date("2024-06-01T00:00:00Z"), "2024-06-01");
        assert_eq!(short_date(""), "");
    }

    #[test]
    fn test_report_table_has_row_per_item() {
        let generated_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut report = Report::new(generated_at);
        report.items.push(ReportItem {
            kind: MediaKind::Movie,
            title: "Heat (1995)".to_string(),
            radarr_id: Some(12),
            sonarr_id: None,
            tmdb_id: Some(949),
            tvdb_id: None,
            imdb_id: None,
            path: "/movies/Heat (1995)".to_string(),
            size_bytes: 4 * 1024 * 1024 * 1024,
            added_at: Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()),
            first_activity_at: None,
            last_activity_at: None,
            top_users: Vec::new(),
            top_users_total_hours: 0.0,
            total_watch_hours: 0.0,
            series_status: None,
            reason: Reason::NeverWatched,
        });

        let rendered = report_table(&report).to_string();
        assert!(rendered.contains("Heat (1995)"));
        assert!(rendered.contains("4.00"));
        assert!(rendered.contains("2023-01-01"));
        assert!(rendered.contains("never_watched"));
    }
}
