use clap::{ArgAction, Parser, Subcommand};
use commands::{config, enrich, review, scan, summary};
use media_prune_config::PathManager;
use media_prune_core::scan::DEFAULT_TOP_USERS;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "mediaprune")]
#[command(about = "mediaprune - Find the movies and series nobody watches anymore")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to the config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write logs to a daily-rotated file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a review report of deletion candidates
    #[command(long_about = "Fetch the Radarr and Sonarr libraries and the Tautulli playback history, apply the configured rules and exceptions, and write the ranked list of deletion candidates. Nothing is deleted.")]
    Scan {
        /// Output path for the JSON review report
        #[arg(long, value_name = "PATH", default_value = "review.json")]
        out: PathBuf,

        /// Optional CSV output path
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Print a table of the results
        #[arg(long, action = ArgAction::SetTrue)]
        table: bool,

        /// Sort by: size, added, gap, last_activity, inactivity
        #[arg(long, default_value = "size")]
        sort: String,

        /// Sort order: asc or desc
        #[arg(long, default_value = "desc")]
        order: String,

        /// Number of top watchers listed per item (0 lists everyone)
        #[arg(long, default_value_t = DEFAULT_TOP_USERS)]
        top_users: usize,
    },
    /// Summarize a review report
    Summary {
        /// Review report to read
        #[arg(long = "in", value_name = "PATH", default_value = "review.json")]
        input: PathBuf,
    },
    /// Walk through a review report and curate exceptions
    #[command(long_about = "Step through every item of a review report. Keep leaves it alone, ignore adds the item's ids to the exception list so future scans skip it, quit stops early. The config is saved when anything was added.")]
    Review {
        /// Review report to read
        #[arg(long = "in", value_name = "PATH", default_value = "review.json")]
        input: PathBuf,
    },
    /// Fill in titles, paths and ids for exceptions listed by id
    #[command(long_about = "Look up every exception listed by Radarr/Sonarr id, TMDB/TVDB id or IMDB id in the current libraries and add the matching title, path and remaining ids to the exception lists.")]
    EnrichExceptions {
        /// Print the changes without saving the config
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Show or create the configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks API keys)
    Show,

    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging_with_file(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_path = cli
        .config
        .unwrap_or_else(|| PathManager::default().config_file());

    match cli.command {
        Commands::Scan {
            out,
            csv,
            table,
            sort,
            order,
            top_users,
        } => {
            let args = scan::ScanArgs {
                out,
                csv,
                table,
                sort,
                order,
                top_users,
            };
            scan::run_scan(&config_path, args, &output).await
        }
        Commands::Summary { input } => summary::run_summary(&input, &output),
        Commands::Review { input } => review::run_review(&config_path, &input, &output),
        Commands::EnrichExceptions { dry_run } => {
            enrich::run_enrich(&config_path, dry_run, &output).await
        }
        Commands::Config { cmd } => config::run_config(cmd, &config_path, &output),
    }
}
