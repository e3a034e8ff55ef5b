use salewatch_config::ConfigLoader;
use salewatch_runtime::BotRuntime;

pub(super) async fn cmd_start(
    config: salewatch_config::SalewatchConfig,
    config_loader: ConfigLoader,
) -> salewatch_core::Result<()> {
    println!("salewatch v{}", env!("CARGO_PKG_VERSION"));
    println!("   Poll interval: {}s", config.bot.poll_interval_secs);
    println!();

    // Startup requires a token and an announce channel; reject before
    // connecting anything.
    let Some(token) = config.discord.token.clone() else {
        eprintln!("❌ No bot token configured.");
        eprintln!();
        eprintln!("   In salewatch.toml:  [discord]");
        eprintln!("                       token = \"...\"");
        eprintln!("   Or env var:         export DISCORD_TOKEN=...");
        return Err(salewatch_core::SalewatchError::ConfigValidation {
            field: "discord.token".into(),
            reason: "missing bot token".into(),
        });
    };
    if config.bot.announce_channel.is_empty() {
        eprintln!("❌ No announce channel configured.");
        eprintln!();
        eprintln!("   In salewatch.toml:  [bot]");
        eprintln!("                       announce_channel = \"<channel id>\"");
        eprintln!("   Or env var:         export SALEWATCH_CHANNEL=<channel id>");
        return Err(salewatch_core::SalewatchError::ConfigValidation {
            field: "bot.announce_channel".into(),
            reason: "missing announce channel".into(),
        });
    }

    // Start config hot-reload watcher (kept alive for duration of runtime)
    let _watcher = match config_loader.watch() {
        Ok(w) => {
            println!("   Config hot-reload: enabled");
            Some(w)
        }
        Err(e) => {
            tracing::warn!(error = %e, "config hot-reload disabled");
            None
        }
    };

    let mut runtime = BotRuntime::new(config_loader.shared())?;
    runtime.add_channel(Box::new(salewatch_channels::discord::DiscordChannel::new(
        "discord".to_string(),
        token,
    )));

    // Run the bot (blocks until shutdown)
    runtime.run().await
}
