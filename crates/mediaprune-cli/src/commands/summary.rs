use crate::output::{header_cell, styled_table, Output, OutputFormat};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use comfy_table::{Cell, CellAlignment};
use media_prune_core::report::{format_size_gib, read_json, summarize};
use media_prune_core::Summary;
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use std::path::Path;

pub fn run_summary(input: &Path, output: &Output) -> Result<()> {
    let report = read_json(input)
        .wrap_err_with(|| format!("Failed to read report {}", input.display()))?;
    let summary = summarize(&report);
    let total_bytes: u64 = report.items.iter().map(|item| item.size_bytes).sum();

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            println!(
                "{} {} ({})",
                "Report".bright_cyan().bold(),
                input.display(),
                report.generated_at.format("%Y-%m-%d %H:%M UTC")
            );
            print_summary(&summary, total_bytes);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let mut payload = serde_json::to_value(&summary)?;
            payload["generated_at"] = serde_json::Value::String(report.generated_at.to_rfc3339());
            payload["size_bytes"] = total_bytes.into();
            output.json(&payload);
        }
    }

    Ok(())
}

fn print_summary(summary: &Summary, total_bytes: u64) {
    println!(
        "Total items: {}  ({} GiB)",
        summary.total.to_string().bold(),
        format_size_gib(total_bytes)
    );

    if summary.total == 0 {
        return;
    }

    println!("{}", count_table("Type", &summary.by_type));
    println!("{}", count_table("Reason", &summary.by_reason));
}

fn count_table(label: &str, counts: &BTreeMap<String, usize>) -> comfy_table::Table {
    let mut table = styled_table();
    table.set_header(vec![header_cell(label), header_cell("Count")]);
    for (key, count) in counts {
        table.add_row(vec![
            Cell::new(key),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
