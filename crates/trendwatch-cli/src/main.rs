use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod interest;
mod media;
mod posts;
mod products;
mod tag;
mod trends;

#[derive(Debug, Parser)]
#[command(name = "trendwatch")]
#[command(about = "Collects trend signals from social platforms into TSV artifacts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect every trend source and write per-source plus combined artifacts.
    Trends {
        /// Skip the browser-driven sources and poll the trends API only.
        #[arg(long)]
        skip_browser: bool,
    },
    /// Search recent posts mentioning an account or carrying hashtags.
    Posts {
        /// Account to search mentions of.
        #[arg(long)]
        username: Option<String>,
        /// Hashtags to search as a disjunction.
        #[arg(long, num_args = 1..)]
        hashtags: Vec<String>,
        /// Requested result count (clamped to the endpoint's 10..=100).
        #[arg(long, default_value_t = 10)]
        max_results: u32,
    },
    /// Collect recent media posts for an account and/or a tag.
    Media {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        hashtag: Option<String>,
        /// Posts fetched per target.
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Regional interest for sampled products of every category.
    Interest {
        /// Two-letter federative-unit code (e.g. SP).
        #[arg(long)]
        state: String,
        /// Per-category sample size (clamped to 3..=5).
        #[arg(long)]
        sample: Option<usize>,
        /// Seed for reproducible sampling.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Mean weekly interest for every product of one category.
    Products {
        /// Category slug from the categories file (e.g. telefonia).
        #[arg(long)]
        category: String,
    },
    /// Annotate TSV artifacts with an extracted-entities column.
    Tag {
        /// Artifacts to annotate.
        files: Vec<PathBuf>,
        /// Name of the free-text column.
        #[arg(long, default_value = "text")]
        column: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = trendwatch_core::load_app_config_from_env()?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Commands::Trends { skip_browser } => trends::run(&config, skip_browser).await,
        Commands::Posts {
            username,
            hashtags,
            max_results,
        } => posts::run(&config, username.as_deref(), &hashtags, max_results).await,
        Commands::Media {
            username,
            hashtag,
            count,
        } => media::run(&config, username.as_deref(), hashtag.as_deref(), count).await,
        Commands::Interest {
            state,
            sample,
            seed,
        } => interest::run(&config, &state, sample, seed).await,
        Commands::Products { category } => products::run(&config, &category).await,
        Commands::Tag { files, column } => tag::run(&files, &column),
    }
}

fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
