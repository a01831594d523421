use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use review_import::config::{ImportConfig, MatchMode};
use review_import::normalization::helpful::HelpfulTiers;
use review_import::normalization::timestamp::TimestampMode;
use review_import::util::env as env_util;
use review_import::{generate_script_from_path, logging};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "review2sql",
    version,
    about = "Generate a SQL import script from a product review CSV export"
)]
struct Cli {
    /// Path to the review CSV export (falls back to REVIEW2SQL_CSV)
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Path to the import config JSON (falls back to REVIEW2SQL_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the script here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// Override the product lookup style from the config file
    #[arg(long, value_enum)]
    match_mode: Option<MatchMode>,
    /// Override the helpful-count tier policy from the config file
    #[arg(long, value_enum)]
    tiers: Option<HelpfulTiers>,
    /// Override the timestamp handling from the config file
    #[arg(long, value_enum)]
    timestamp_mode: Option<TimestampMode>,
    /// Drop the JSONB image column from the generated INSERTs
    /// (falls back to REVIEW2SQL_NO_IMAGE_URLS)
    #[arg(long, default_value_t = false)]
    no_image_urls: bool,
}

fn main() -> Result<()> {
    env_util::init_env();
    logging::init_tracing("info")?;
    let cli = Cli::parse();

    let csv_path = cli
        .csv
        .or_else(|| env_util::env_opt("REVIEW2SQL_CSV").map(PathBuf::from))
        .context("no CSV path; pass --csv or set REVIEW2SQL_CSV")?;
    let config_path = cli
        .config
        .or_else(|| env_util::env_opt("REVIEW2SQL_CONFIG").map(PathBuf::from))
        .context("no config path; pass --config or set REVIEW2SQL_CONFIG")?;

    let mut cfg = ImportConfig::load(&config_path)?;
    if let Some(mode) = cli.match_mode {
        cfg.match_mode = mode;
    }
    if let Some(tiers) = cli.tiers {
        cfg.helpful_tiers = tiers;
    }
    if let Some(mode) = cli.timestamp_mode {
        cfg.timestamp_mode = mode;
    }
    if cli.no_image_urls || env_util::env_flag("REVIEW2SQL_NO_IMAGE_URLS", false) {
        cfg.image_urls_column = None;
    }
    info!(
        csv = %csv_path.display(),
        mapped_products = cfg.product_mapping.len(),
        ?cfg.match_mode,
        "generating import script"
    );

    let script = generate_script_from_path(&cfg, &csv_path)?;

    // Nothing is written until the whole script rendered.
    match &cli.output {
        Some(path) => fs::write(path, &script)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(script.as_bytes())
            .context("failed to write script to stdout")?,
    }
    Ok(())
}
