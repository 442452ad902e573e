use std::time::Duration;

use catalog_checker::checker::{self, DEFAULT_SEED_SONG_ID};
use catalog_checker::clients::{catalog::DEFAULT_BASE_URL, entities::SongId, errors::Result};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(name = "catalog-checker")]
#[command(version, about = "Run contract checks against a songs and playlists catalog API", long_about = None)]
struct Cli {
    /// Base URL of the catalog API
    #[arg(long, env = "CATALOG_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Song id that must already exist in the catalog's seed data
    #[arg(long, env = "CATALOG_SEED_SONG_ID", default_value_t = DEFAULT_SEED_SONG_ID)]
    seed_song_id: SongId,

    /// Per-request timeout in seconds
    #[arg(long, env = "CATALOG_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    info!("Building config ...");
    let config = checker::ConfigBuilder::new()
        .base_url(cli.base_url)
        .seed_song_id(cli.seed_song_id)
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;
    let mut checker = checker::Checker::new(config);
    checker.run().await
}
