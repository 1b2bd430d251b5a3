//! Subburn - Subtitle Transfer Pipeline
//!
//! Command line entry point: loads configuration, sets up logging and runs
//! the pipeline or one of its inspection helpers.

use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subburn::cli::{Args, Commands};
use subburn::config::{Config, RunConfig};
use subburn::language::LanguageInferencer;
use subburn::pipeline::{DeliveryOutcome, Pipeline};
use subburn::query::QueryGenerator;
use subburn::region::{RegionEstimator, Resolution};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Run { title, output, workdir, shared_workdir, telegram_token, telegram_chat_id } => {
            let title = title.trim();
            if title.is_empty() {
                bail!("Title must not be empty");
            }

            if let Some(output) = output {
                config.pipeline.output = output;
            }
            if let Some(workdir) = workdir {
                config.pipeline.workdir = workdir;
            }
            if shared_workdir {
                config.pipeline.isolate_runs = false;
            }
            if telegram_token.is_some() {
                config.delivery.token = telegram_token;
            }
            if telegram_chat_id.is_some() {
                config.delivery.chat_id = telegram_chat_id;
            }

            let run_config = RunConfig::from_config(&config);
            let pipeline = Pipeline::from_config(&config)?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
            spinner.set_message(format!("Processing {}", title));
            spinner.enable_steady_tick(Duration::from_millis(120));

            let result = pipeline.run(title, &run_config).await;
            spinner.finish_and_clear();

            let report = result?;
            println!("Output: {}", report.output.display());
            println!("Source: {} (query: {})", report.subtitled_title, report.query);
            match &report.delivery {
                DeliveryOutcome::Failed(message) => {
                    eprintln!("Delivery failed: {}", message);
                }
                outcome => println!("Delivery: {}", outcome),
            }
        }
        Commands::Queries { title } => {
            let generator = QueryGenerator::new(config.search.keywords.clone());
            for (index, query) in generator.candidates(&title).enumerate() {
                println!("{:>3}. {}", index + 1, query);
            }
        }
        Commands::Region { width, height } => {
            let region = RegionEstimator::new(config.region.clone())?.estimate(Resolution::new(width, height));
            println!(
                "y_min={} y_max={} x_min={} x_max={}",
                region.y_min, region.y_max, region.x_min, region.x_max
            );
        }
        Commands::Language { title } => {
            let language = LanguageInferencer::new(config.language.clone()).infer(&title);
            if language.is_unspecified() {
                println!("auto");
            } else {
                println!("{}", language);
            }
        }
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".subburn").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation
    let file_appender = rolling::daily(&log_dir, "subburn.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
