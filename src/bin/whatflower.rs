//! whatflower: identify a flower in a photo.
//!
//! Runs the classify-then-enrich pipeline once and prints the result.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use whatflower::config::Config;
use whatflower::{EnrichedResult, NO_INFORMATION_PLACEHOLDER, WhatFlowerError, WikipediaClient};

/// Identify flowers and look them up on Wikipedia
#[derive(Parser)]
#[command(name = "whatflower")]
#[command(version = whatflower::PKG_VERSION, long_version = whatflower::version::long_version())]
#[command(about = "Identify a flower from a photo")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, global = true, env = "WHATFLOWER_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a photo and fetch a summary for the top label
    Identify {
        /// Image file (PNG, JPEG or WebP)
        image: PathBuf,
    },

    /// Fetch the encyclopedia summary for a flower name
    Lookup {
        /// Flower name, e.g. "sunflower"
        topic: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Identify { image } => identify(&config, &image, args.json).await,
        Command::Lookup { topic } => lookup(&config, &topic, args.json).await,
    }
}

async fn identify(
    config: &Config,
    image_path: &Path,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let pipeline = whatflower::ClassifyAndEnrichPipeline::builder()
        .config(config)?
        .build()?;
    let image = whatflower::Image::open(image_path)?;
    info!(
        version = whatflower::version_string(),
        image = %image_path.display(),
        "identifying"
    );

    // Ctrl-C abandons the run at the next step boundary.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = match pipeline.run_with_cancel(&image, &cancel).await {
        Ok(result) => result,
        Err(WhatFlowerError::Cancelled) => {
            eprintln!("cancelled");
            return Ok(ExitCode::from(130));
        }
        Err(e) => return Err(e.into()),
    };

    print_result(&result, json)?;
    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn lookup(
    config: &Config,
    topic: &str,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let client = WikipediaClient::from_config(&config.encyclopedia)?;
    let summary = client.lookup(topic).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", summary.title);
    if summary.has_extract() {
        println!("{}", summary.extract);
    } else {
        println!("{NO_INFORMATION_PLACEHOLDER}");
    }
    if let Some(url) = &summary.thumbnail_url {
        println!("thumbnail: {url}");
    }
    Ok(ExitCode::SUCCESS)
}

fn print_result(result: &EnrichedResult, json: bool) -> serde_json::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    match result.confidence {
        Some(confidence) if !result.label.is_empty() => {
            println!("{} ({:.1}%)", result.display_title(), confidence * 100.0)
        }
        _ => println!("(unidentified)"),
    }
    println!("{}", result.message());
    if let Some(url) = result.thumbnail_url() {
        println!("thumbnail: {url}");
    }
    if let Some(error) = &result.error {
        eprintln!("error: {error}");
    }
    Ok(())
}
