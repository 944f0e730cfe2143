use super::config::load_config;
use super::scan_ui::ScanUI;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_prune_core::enrich_exceptions;
use media_prune_sources::{RadarrClient, SonarrClient};
use serde_json::json;
use std::path::Path;
use tracing::info;

pub async fn run_enrich(config_path: &Path, dry_run: bool, output: &Output) -> Result<()> {
    let mut config = load_config(config_path)?;

    let radarr = RadarrClient::new(&config.radarr).map_err(|e| eyre!("{:#}", e))?;
    let sonarr = SonarrClient::new(&config.sonarr).map_err(|e| eyre!("{:#}", e))?;

    let ui = ScanUI::new(output.is_quiet());
    ui.set_message("Fetching Radarr and Sonarr libraries...");
    let fetched = tokio::try_join!(radarr.movies(), sonarr.series());
    ui.finish();
    let (movies, series) = fetched.map_err(|e| eyre!("{:#}", e))?;

    let changes = enrich_exceptions(&mut config.exceptions, &movies, &series);
    info!(count = changes.len(), dry_run, "Enriched exceptions");

    let saved = !changes.is_empty() && !dry_run;
    if saved {
        config
            .save_to_file(config_path)
            .map_err(|e| eyre!("Failed to save config to {}: {}", config_path.display(), e))?;
    }

    match output.format() {
        OutputFormat::Human => {
            if changes.is_empty() {
                output.info("No exception changes.");
                return Ok(());
            }
            for change in &changes {
                output.info(format!("  + {}", change));
            }
            if saved {
                output.success(format!(
                    "Updated {} exceptions in {}",
                    changes.len(),
                    config_path.display()
                ));
            } else {
                output.warn(format!("Dry run: {} exceptions would be updated", changes.len()));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "changes": changes,
                "dry_run": dry_run,
                "saved": saved,
            }));
        }
    }

    Ok(())
}
