use crate::output::{header_cell, styled_table, Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_prune_config::{Config, ServiceConfig};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn run_config(cmd: ConfigCommands, config_path: &Path, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(config_path, output),
        ConfigCommands::Init { force } => init_config(config_path, force, output),
    }
}

/// Load, fill defaults and validate the config file.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(eyre!(
            "Configuration file not found at {}. Run 'mediaprune config init' to create one.",
            path.display()
        ));
    }
    let config = Config::load_from_file(path).map_err(|e| eyre!("{:#}", e))?;
    config
        .validate()
        .map_err(|e| eyre!("Invalid config {}: {}", path.display(), e))?;
    Ok(config)
}

fn init_config(config_path: &Path, force: bool, output: &Output) -> Result<()> {
    if config_path.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
        return Ok(());
    }

    Config::template()
        .save_to_file(config_path)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_path.display(), e))?;
    output.success(format!("Wrote starter config to {}", config_path.display()));
    output.info("Fill in the base_url and api_key of each service before running a scan.");
    Ok(())
}

fn show_config(config_path: &Path, output: &Output) -> Result<()> {
    if !config_path.exists() {
        output.warn(format!("Configuration file not found at: {}", config_path.display()));
        output.info("Run 'mediaprune config init' to create one.");
        return Ok(());
    }

    // Shown even when invalid so the user can see what to fix
    let config = Config::load_from_file(config_path).map_err(|e| eyre!("{:#}", e))?;
    let validation = config.validate().err().map(|e| e.to_string());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "╔════════════════════════════════════════════════════════════╗".bright_white());
            println!("{} {}", "║".bright_white(), "Configuration".bright_cyan().bold());
            println!("{}", "╚════════════════════════════════════════════════════════════╝".bright_white());
            println!();

            let mut info_table = styled_table();
            info_table.set_header(vec![
                Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
                Cell::new(config_path.display().to_string()),
            ]);
            println!("{}", info_table);
            println!();

            let mut services = styled_table();
            services.set_header(vec![header_cell("Service"), header_cell("Base URL"), header_cell("API Key")]);
            for (name, service) in [
                ("Tautulli", &config.tautulli),
                ("Sonarr", &config.sonarr),
                ("Radarr", &config.radarr),
            ] {
                services.add_row(service_row(name, service));
            }
            println!("{}", services);
            println!();

            println!("{}", rules_table(&config));
            println!();

            let exceptions = &config.exceptions;
            let mut exception_table = styled_table();
            exception_table.set_header(vec![
                header_cell("Exceptions"),
                header_cell("Movies"),
                header_cell("Series"),
            ]);
            exception_table.add_row(vec![
                Cell::new("Catalog ids"),
                Cell::new(exceptions.movies.radarr_ids.len()),
                Cell::new(exceptions.series.sonarr_ids.len()),
            ]);
            exception_table.add_row(vec![
                Cell::new("TMDB / TVDB ids"),
                Cell::new(exceptions.movies.tmdb_ids.len()),
                Cell::new(exceptions.series.tvdb_ids.len()),
            ]);
            exception_table.add_row(vec![
                Cell::new("IMDB ids"),
                Cell::new(exceptions.movies.imdb_ids.len()),
                Cell::new(exceptions.series.imdb_ids.len()),
            ]);
            exception_table.add_row(vec![
                Cell::new("Titles"),
                Cell::new(exceptions.movies.titles.len()),
                Cell::new(exceptions.series.titles.len()),
            ]);
            exception_table.add_row(vec![
                Cell::new("Path prefixes"),
                Cell::new(exceptions.movies.path_prefixes.len()),
                Cell::new(exceptions.series.path_prefixes.len()),
            ]);
            println!("{}", exception_table);

            if let Some(problem) = &validation {
                println!();
                output.warn(format!("Config is not valid: {}", problem));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let service_json = |service: &ServiceConfig| {
                json!({
                    "base_url": service.base_url,
                    "api_key": mask_string(&service.api_key),
                })
            };
            let mut payload = json!({
                "config_file": config_path.display().to_string(),
                "tautulli": service_json(&config.tautulli),
                "sonarr": service_json(&config.sonarr),
                "radarr": service_json(&config.radarr),
                "rules": config.rules,
                "exceptions": config.exceptions,
            });
            if let Some(problem) = validation {
                payload["error"] = json!(problem);
            }
            output.json(&payload);
        }
    }

    Ok(())
}

fn service_row(name: &str, service: &ServiceConfig) -> Vec<Cell> {
    let base_url = if service.base_url.is_empty() {
        "<not set>".to_string()
    } else {
        service.base_url.clone()
    };
    vec![
        Cell::new(name),
        Cell::new(base_url),
        Cell::new(mask_string(&service.api_key)),
    ]
}

fn rules_table(config: &Config) -> Table {
    let rules = &config.rules;
    let flag = |on: bool| if on { "✓".green().to_string() } else { "✗".red().to_string() };

    let mut table = styled_table();
    table.set_header(vec![header_cell("Rules"), header_cell("Value")]);
    table.add_row(vec![
        Cell::new("Minimum watch percent"),
        Cell::new(format!("{}%", rules.activity_min_percent)),
    ]);
    table.add_row(vec![
        Cell::new("Inactive after watch"),
        Cell::new(format!("{} days", rules.inactivity_days_after_watch)),
    ]);
    table.add_row(vec![
        Cell::new("Never watched since added"),
        Cell::new(format!("{} days", rules.never_watched_days_since_added)),
    ]);
    if rules.low_watch_enabled() {
        table.add_row(vec![
            Cell::new("Low watch"),
            Cell::new(format!(
                "≤ {}h after {} days",
                rules.low_watch_max_hours, rules.low_watch_min_added_days
            )),
        ]);
    } else {
        table.add_row(vec![Cell::new("Low watch"), Cell::new(flag(false))]);
    }
    table.add_row(vec![Cell::new("Require low watch"), Cell::new(flag(rules.low_watch_require))]);
    table.add_row(vec![Cell::new("Ended series only"), Cell::new(flag(rules.series_ended_only))]);
    table
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_API_KEY" {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
