use super::config::load_config;
use super::prompts::prompt_select;
use super::scan_ui::is_interactive;
use crate::output::Output;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use media_prune_config::{add_unique_int, add_unique_string, Exceptions};
use media_prune_core::report::{
    format_gap_days, format_hours, format_inactivity_days, format_optional_time, format_size_gib,
    format_top_users, read_json,
};
use media_prune_models::{MediaKind, Report, ReportItem};
use owo_colors::OwoColorize;
use std::path::Path;
use tracing::debug;

const ACTIONS: [&str; 3] = ["keep", "ignore (add to exceptions)", "quit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Keep,
    Ignore,
    Quit,
}

impl Action {
    fn from_index(index: usize) -> Self {
        match index {
            1 => Action::Ignore,
            2 => Action::Quit,
            _ => Action::Keep,
        }
    }
}

pub fn run_review(config_path: &Path, input: &Path, output: &Output) -> Result<()> {
    if !is_interactive() {
        return Err(eyre!("review needs an interactive terminal"));
    }

    let mut config = load_config(config_path)?;
    let report = read_json(input)
        .wrap_err_with(|| format!("Failed to read report {}", input.display()))?;

    if report.items.is_empty() {
        output.info("Nothing to review.");
        return Ok(());
    }

    let mut changed = false;
    let total = report.items.len();

    for (idx, item) in report.items.iter().enumerate() {
        print_item(idx + 1, total, item, &report);

        match Action::from_index(prompt_select("Action", &ACTIONS, 0)?) {
            Action::Keep => {
                debug!(title = %item.title, "Keeping item");
            }
            Action::Ignore => {
                if add_exception(&mut config.exceptions, item) {
                    changed = true;
                    output.success("Added to exceptions.");
                } else {
                    output.warn("Already excluded or no ids to add.");
                }
            }
            Action::Quit => break,
        }
    }

    if changed {
        config
            .save_to_file(config_path)
            .map_err(|e| eyre!("Failed to save config to {}: {}", config_path.display(), e))?;
        output.success(format!("Saved config to {}", config_path.display()));
    }

    Ok(())
}

fn print_item(position: usize, total: usize, item: &ReportItem, report: &Report) {
    println!();
    println!(
        "[{}/{}] {} ({})",
        position,
        total,
        item.title.bold(),
        item.kind
    );
    println!("  Size: {} GiB", format_size_gib(item.size_bytes));
    println!("  Added: {}", format_optional_time(item.added_at));
    println!("  First activity: {}", format_optional_time(item.first_activity_at));
    println!("  Last activity: {}", format_optional_time(item.last_activity_at));
    println!("  Gap days: {}", format_gap_days(item, report.generated_at));
    println!("  Inactivity days: {}", format_inactivity_days(item, report.generated_at));
    if !item.top_users.is_empty() {
        println!(
            "  Top users: {}",
            format_top_users(&item.top_users, item.top_users_total_hours)
        );
    }
    if item.total_watch_hours > 0.0 {
        println!("  Total watch hours: {}", format_hours(item.total_watch_hours));
    }
    if let Some(status) = &item.series_status {
        println!("  Status: {}", status);
    }
    println!("  Reason: {}", item.reason.yellow());
    println!("  Path: {}", item.path);
}

/// Add the item's catalog, external and IMDB ids to the exceptions of its kind.
///
/// Returns whether anything new was added.
fn add_exception(exceptions: &mut Exceptions, item: &ReportItem) -> bool {
    let imdb_id = item.imdb_id.as_deref().unwrap_or("");
    let local_id = item.local_id().unwrap_or(0);
    let external_id = item.external_id().unwrap_or(0);

    match item.kind {
        MediaKind::Movie => {
            let movies = &mut exceptions.movies;
            let mut changed = add_unique_int(&mut movies.radarr_ids, local_id);
            changed |= add_unique_int(&mut movies.tmdb_ids, external_id);
            changed |= add_unique_string(&mut movies.imdb_ids, imdb_id);
            changed
        }
        MediaKind::Series => {
            let series = &mut exceptions.series;
            let mut changed = add_unique_int(&mut series.sonarr_ids, local_id);
            changed |= add_unique_int(&mut series.tvdb_ids, external_id);
            changed |= add_unique_string(&mut series.imdb_ids, imdb_id);
            changed
        }
    }
}
