// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::consts::*;
use crate::config::{CollectOptions, GeocoderOptions, PresentOptions};
use crate::error::Result;
use crate::progress::{BarProgress, NullProgress, Progress};
use crate::{present, scrape};

#[derive(Debug, Parser)]
#[command(
    name = "testsites",
    version,
    about = "Scrape, geocode and export NYC COVID-19 testing sites"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Also append debug logs to this file (bare flag: .store/debug.log)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, default_missing_value = LOG_FILE)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape the page, geocode new addresses and rewrite the snapshot
    Collect(CollectArgs),
    /// Export the snapshot as GeoJSON with popups and optional wait times
    Present(PresentArgs),
}

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Testing-sites page to scrape
    #[arg(long, default_value = PAGE_URL)]
    pub url: String,

    /// Snapshot file (read as cache, then overwritten)
    #[arg(long, default_value = DATA_FILE)]
    pub data: PathBuf,

    /// Geocoding API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = GEOCODE_ENDPOINT)]
    pub geocode_endpoint: String,

    /// Minimum gap between geocoding requests, in milliseconds
    #[arg(long, default_value_t = REQUEST_PAUSE_MS)]
    pub pause_ms: u64,

    #[arg(long, default_value_t = TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// No progress bar
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Debug, Args)]
pub struct PresentArgs {
    /// Snapshot file to read
    #[arg(long, default_value = DATA_FILE)]
    pub data: PathBuf,

    /// Wait-time feed: JSON array of {fullname, wait_time, last_reported}
    #[arg(long, value_name = "PATH")]
    pub wait_times: Option<PathBuf>,

    /// Output GeoJSON (default: snapshot path with .geojson)
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

impl From<CollectArgs> for CollectOptions {
    fn from(a: CollectArgs) -> Self {
        let mut geocoder = GeocoderOptions {
            endpoint: a.geocode_endpoint,
            api_key: None,
            pause: Duration::from_millis(a.pause_ms),
            timeout: Duration::from_secs(a.timeout_secs),
        };
        geocoder.set_api_key(a.api_key);
        CollectOptions { page_url: a.url, data_file: a.data, geocoder }
    }
}

impl From<PresentArgs> for PresentOptions {
    fn from(a: PresentArgs) -> Self {
        let out = a.out.unwrap_or_else(|| a.data.with_extension("geojson"));
        PresentOptions { data_file: a.data, wait_times: a.wait_times, out }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Collect(args) => {
            let quiet = args.quiet;
            let opts = CollectOptions::from(args);
            let mut bar = BarProgress::new();
            let mut null = NullProgress;
            let progress: &mut dyn Progress = if quiet { &mut null } else { &mut bar };

            let summary = scrape::collect(&opts, progress).await?;
            println!(
                "Wrote {} ({} resolved, {} unresolved)",
                summary.path.display(),
                summary.resolved,
                summary.unresolved()
            );
            for (i, name, reason) in &summary.failed {
                println!("  #{i} {name}: {reason}");
            }
        }
        Command::Present(args) => {
            let opts = PresentOptions::from(args);
            let n = present::export(&opts)?;
            println!("Wrote {} ({} features)", opts.out.display(), n);
        }
    }
    Ok(())
}
