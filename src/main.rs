//! Honyaku - English detection and translation
//!
//! Command-line entry point: translate a single text, run the HTTP
//! translate service, or check the configured ollama model.

use std::io::Read;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use honyaku::cli::{Args, Commands};
use honyaku::config::Config;
use honyaku::server;
use honyaku::translate::Translator;

const DEFAULT_CONFIG_FILE: &str = "honyaku.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let mut config = load_config(args.config.as_deref())?;
    config.apply_env_overrides();

    match args.command {
        Commands::Translate { text, file, mode, json } => {
            if let Some(demo_mode) = mode.demo_mode() {
                config.translator.demo_mode = demo_mode;
            }

            let content = read_input(text, file)?;
            let translator = Translator::new(config.translator);
            let result = translator.translate(&content).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.text);
            }
        }
        Commands::Serve { bind, mode } => {
            if let Some(demo_mode) = mode.demo_mode() {
                config.translator.demo_mode = demo_mode;
            }
            let bind = bind.unwrap_or(config.server.bind);

            server::serve(Translator::new(config.translator), &bind).await?;
        }
        Commands::Check => {
            let translator = Translator::new(config.translator);
            translator.check_model().await?;
            println!(
                "Model '{}' is available at {}",
                translator.config().model,
                translator.config().endpoint
            );
        }
        Commands::InitConfig { output } => {
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

/// Explicit path, else `honyaku.toml` in the working directory, else defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Ok(Config::from_file(DEFAULT_CONFIG_FILE)?)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(file) = file {
        return std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()));
    }

    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read stdin")?;
    Ok(content)
}

/// Setup logging to both console (stderr) and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".honyaku").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation; the guard must outlive the program
    let file_appender = rolling::daily(&log_dir, "honyaku.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("honyaku.log").display());

    Ok(())
}
