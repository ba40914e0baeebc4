mod scrape;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ugcfinder")]
#[command(about = "Rank creator profiles by recent video engagement")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG / UGCFINDER_LOG_LEVEL
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate every creator found in a hashtag-results JSON file
    Scrape(ScrapeArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ScrapeArgs {
    /// Hashtag-results JSON file to read creators from
    pub file: PathBuf,

    /// Recent videos to sample per profile
    #[arg(long)]
    pub recent_videos: Option<usize>,

    /// Stop after this many profiles
    #[arg(long)]
    pub limit: Option<usize>,

    /// First profile index to process
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub from: i64,

    /// Index to stop before; negative means the end of the list
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub to: i64,

    /// Minimum follower count, e.g. 5000 or 10k
    #[arg(long, default_value = "0")]
    pub min_followers: String,

    /// Maximum follower count, e.g. 2M, or INF for no limit
    #[arg(long, default_value = "INF")]
    pub max_followers: String,

    /// Stats API server, overrides UGCFINDER_API_SERVER
    #[arg(long)]
    pub api_server: Option<String>,

    /// Directory results are written to, overrides UGCFINDER_WORKING_DIR
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// File format results are saved in
    #[arg(long, value_enum, default_value_t = ResultFormat::Json)]
    pub result_format: ResultFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ResultFormat {
    Json,
    Xlsx,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ugcfinder_core::load_app_config()?;

    let env_filter = if cli.verbose {
        EnvFilter::try_new("debug")?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Scrape(args) => scrape::run_scrape(config, args).await,
    }
}
