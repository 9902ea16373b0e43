mod cli;
mod config;
mod domain;
mod error;
mod infra;
mod media;
mod workflows;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::{RunConfig, Settings};
use infra::subsource::SubsourceClient;
use workflows::{classifier, engine, scan};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("subsource_dl=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let config = RunConfig::new(&cli, &settings);
    let client = SubsourceClient::new(&settings).context("Failed to build HTTP client")?;

    let files = scan::find_video_files(&cli.path)?;
    info!(count = files.len(), "Found video file(s) without subtitles");

    let mut groups = classifier::classify(files);
    let summary = engine::process_groups(&client, &config, &mut groups);

    info!(
        groups = summary.groups,
        failed_lookups = summary.failed_lookups,
        downloaded = summary.downloaded,
        pending = summary.pending,
        "Run finished"
    );
    println!(
        "{} group(s), {} lookup failure(s), {} video(s) downloaded, {} without subtitles",
        summary.groups, summary.failed_lookups, summary.downloaded, summary.pending
    );

    Ok(())
}
