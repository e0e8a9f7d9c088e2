// src/bin/cli.rs
use clap::Parser;
use color_eyre::eyre::Result;

use testsites_scrape::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    testsites_scrape::log::init(args.verbose, args.log_file.as_deref())?;
    cli::run(args).await?;
    Ok(())
}
