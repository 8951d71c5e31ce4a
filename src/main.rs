//! Folio - a terminal editor for pages stored behind a content API.
//!
//! # Usage
//!
//! ```bash
//! folio
//! folio --api-url http://localhost:3000
//! folio --api-url http://pages.internal --timeout 5 --save
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use folio::app::App;
use folio::config::{
    API_URL_ENV, ConfigFlags, Settings, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};

/// A terminal editor for pages stored behind a content API
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Cli {
    /// Base URL of the content API (falls back to $FOLIO_API_URL, then http://localhost:3000)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Write logs to this file [default: folio.log in the temp dir]
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

/// Send logs to `settings.log_file`; the terminal belongs to the UI.
fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("Failed to open log file {}", settings.log_file.display()))?;
    let level = if settings.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    let settings = Settings::resolve(&effective, std::env::var(API_URL_ENV).ok());

    init_logging(&settings)?;
    info!(?settings, "resolved settings");

    let mut app = App::new(settings.api_url)
        .with_timeout(settings.timeout)
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}
