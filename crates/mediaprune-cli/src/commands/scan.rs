use super::config::load_config;
use super::scan_ui::ScanUI;
use crate::output::{report_table, Output, OutputFormat};
use chrono::Utc;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use media_prune_core::report::{summarize, write_csv, write_json};
use media_prune_core::scan::{self as core_scan, ScanInput, ScanOptions};
use media_prune_sources::{RadarrClient, SonarrClient, TautulliClient};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ScanArgs {
    pub out: PathBuf,
    pub csv: Option<PathBuf>,
    pub table: bool,
    pub sort: String,
    pub order: String,
    pub top_users: usize,
}

pub async fn run_scan(config_path: &Path, args: ScanArgs, output: &Output) -> Result<()> {
    let config = load_config(config_path)?;
    // Reject a bad --sort/--order before spending time on the fetch
    let options = ScanOptions::parse(&args.sort, &args.order, args.top_users)
        .map_err(|e| eyre!("{}", e))?;

    let radarr = RadarrClient::new(&config.radarr).map_err(|e| eyre!("{:#}", e))?;
    let sonarr = SonarrClient::new(&config.sonarr).map_err(|e| eyre!("{:#}", e))?;
    let tautulli = TautulliClient::new(&config.tautulli).map_err(|e| eyre!("{:#}", e))?;

    let ui = ScanUI::new(output.is_quiet());
    ui.set_message("Fetching Radarr, Sonarr and Tautulli...");

    let fetched = tokio::try_join!(radarr.movies(), sonarr.series(), tautulli.history());
    ui.finish();
    let (movies, series, history) = fetched.map_err(|e| eyre!("{:#}", e))?;

    info!(
        movies = movies.len(),
        series = series.len(),
        history = history.len(),
        "Fetched sources"
    );

    let input = ScanInput {
        movies,
        series,
        history,
    };
    let report = core_scan::run(&input, &config, &options, Utc::now());

    write_json(&args.out, &report)
        .wrap_err_with(|| format!("Failed to write report to {}", args.out.display()))?;

    if let Some(csv_path) = &args.csv {
        write_csv(csv_path, &report)
            .wrap_err_with(|| format!("Failed to write CSV to {}", csv_path.display()))?;
    }

    match output.format() {
        OutputFormat::Human => {
            output.success(format!(
                "Wrote report to {} ({} items)",
                args.out.display(),
                report.items.len()
            ));
            if let Some(csv_path) = &args.csv {
                output.success(format!(
                    "Wrote CSV to {} ({} items)",
                    csv_path.display(),
                    report.items.len()
                ));
            }
            if args.table && !output.is_quiet() {
                println!("{}", report_table(&report));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "report": args.out.display().to_string(),
                "csv": args.csv.as_ref().map(|p| p.display().to_string()),
                "items": report.items.len(),
                "summary": summarize(&report),
            }));
        }
    }

    Ok(())
}
