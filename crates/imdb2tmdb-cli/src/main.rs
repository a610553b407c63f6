use clap::{ArgAction, Parser};
use commands::import::{self, ImportOptions};
use media_sync_config::PathManager;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "imdb2tmdb")]
#[command(about = "Imports exported movie/series lists in CSV format from IMDb into The Movie DB")]
#[command(version)]
struct Cli {
    /// Location of the CSV export
    csv: PathBuf,

    /// Minimum rating for adding to favorites [default: 8, or [import] favorite_threshold]
    #[arg(short, long, value_name = "RATING", value_parser = clap::value_parser!(u8).range(0..=10))]
    favorite: Option<u8>,

    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Output format
    #[arg(long, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Configuration file [default: <config dir>/imdb2tmdb/config.toml]. Coming from tmdb.ini? Copy its [keys] api and [tokens] session there as TOML strings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Resolution cache file [default: <config dir>/imdb2tmdb/data/cache/imdb_to_tmdb_media.json]
    #[arg(long, value_name = "PATH")]
    cache: Option<PathBuf>,

    /// Also write logs to a daily-rotated file (--log-file=PATH; default location when PATH is omitted)
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    log_file: Option<Option<PathBuf>>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();

    let log_file = cli.log_file.map(|path| path.unwrap_or_else(|| paths.log_file()));
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let options = ImportOptions {
        csv: cli.csv,
        favorite_threshold: cli.favorite,
        config_path: cli.config.unwrap_or_else(|| paths.config_file()),
        cache_path: cli.cache.unwrap_or_else(|| paths.resolution_cache_file()),
    };
    import::run_import(options, &output).await
}
