use clap::{Parser, Subcommand};
use std::path::PathBuf;

use salewatch_config::ConfigLoader;

mod init;
mod start;

/// salewatch — wishlist price-tracking chat bot
#[derive(Parser)]
#[command(name = "salewatch", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to salewatch.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the bot and start tracking prices
    Start,
    /// Show the resolved configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a starter salewatch.toml
    Init {
        /// Create in current directory instead of ~/.salewatch/
        #[arg(long)]
        local: bool,
    },
    /// Show version and build info
    Version,
}

impl Cli {
    pub async fn run(self) -> salewatch_core::Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config default
        let log_level = if self.verbose {
            "debug".to_string()
        } else if self.quiet {
            "error".to_string()
        } else {
            self.log_level
                .clone()
                .unwrap_or_else(|| config.logging.level.clone())
        };

        // Initialize tracing with the configured format
        if config.logging.format == "json" {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
                )
                .json()
                .with_target(true)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
                )
                .with_target(false)
                .init();
        }

        match self.command {
            Commands::Start => start::cmd_start(config, config_loader).await,
            Commands::Config { json } => Self::cmd_config(config, json),
            Commands::Init { local } => init::cmd_init(local),
            Commands::Version => Self::cmd_version(),
        }
    }

    fn cmd_config(config: salewatch_config::SalewatchConfig, json: bool) -> salewatch_core::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| salewatch_core::SalewatchError::Config(e.to_string()))?
            );
        }
        Ok(())
    }

    fn cmd_version() -> salewatch_core::Result<()> {
        println!("salewatch v{}", env!("CARGO_PKG_VERSION"));
        println!("   Target: {}", std::env::consts::ARCH);
        println!("   OS: {}", std::env::consts::OS);
        Ok(())
    }
}
