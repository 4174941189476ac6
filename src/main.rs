use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use depdate::check::parse_cutoff;
use depdate::check::walker::Walker;
use depdate::config::{self, Config, DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_PARALLEL_LIMIT};
use depdate::lockfile::loader;
use depdate::registry::cache::MetadataCache;
use depdate::registry::client::RegistryClient;
use depdate::registry::fetcher::NpmCli;
use depdate::report::Reporter;

#[derive(Parser)]
#[command(name = "depdate")]
#[command(version, about = "Check locked npm dependencies against a publish-date cutoff")]
struct Cli {
    /// Cutoff date: RFC 3339, 'YYYY-MM-DD HH:MM:SS', or 'YYYY-MM-DD'
    date: String,

    /// Path to package-lock.json (default: nearest one upward from here)
    #[arg(long)]
    lockfile: Option<PathBuf>,

    /// Also check transitive dependencies after the direct pass
    #[arg(long)]
    full_graph: bool,

    /// Treat every cache entry as absent, forcing refetches
    #[arg(long)]
    ignore_cache: bool,

    /// Keep pre-release versions as downgrade candidates
    #[arg(long)]
    include_prerelease: bool,

    /// How many metadata lookups may be in flight at once
    #[arg(long, default_value_t = DEFAULT_PARALLEL_LIMIT)]
    parallel: usize,

    /// Cap on captured `npm info` output, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_OUTPUT_BYTES)]
    max_output: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depdate=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cutoff = parse_cutoff(&cli.date).context("failed to parse the cutoff date argument")?;

    let lockfile_path = match cli.lockfile {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            loader::discover(&cwd)?
        }
    };
    let lock = loader::load(&lockfile_path)
        .with_context(|| format!("failed to load {}", lockfile_path.display()))?;

    let config = Config {
        ignore_cache: cli.ignore_cache,
        include_prerelease: cli.include_prerelease,
        full_graph: cli.full_graph,
        parallel_limit: cli.parallel,
        max_output_bytes: cli.max_output,
    };

    let cache = MetadataCache::new(
        config::cache_dir(),
        config::DEFAULT_FRESHNESS_WINDOW,
        config.ignore_cache,
    );
    let client = RegistryClient::new(Box::new(NpmCli::new(config.max_output_bytes)), cache);

    let reporter = Reporter::new();
    reporter.banner(cutoff);

    let walker = Walker::new(&client, &config, cutoff);
    let reports = walker.walk(&lock, &reporter).await;
    reporter.summary(&reports);

    Ok(())
}
