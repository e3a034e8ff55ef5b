use std::path::PathBuf;

pub(super) fn cmd_init(local: bool) -> salewatch_core::Result<()> {
    let dir = if local {
        std::env::current_dir()?
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".salewatch")
    };

    std::fs::create_dir_all(&dir)?;
    let config_path = dir.join("salewatch.toml");

    if config_path.exists() {
        println!("⚠️  {} already exists", config_path.display());
        return Ok(());
    }

    let starter = r#"# salewatch configuration

[bot]
# Channel ID where sale alerts are announced (numeric snowflake).
announce_channel = ""
# Seconds between price-scan passes.
poll_interval_secs = 1800
# Where wishlists.json and tracked.json live; relative paths resolve
# against ~/.salewatch/.
# data_dir = "data"

[discord]
# Bot token — or export DISCORD_TOKEN instead.
# token = "..."

[storefront]
# api_base = "https://store.steampowered.com/api"
# timeout_secs = 10

[logging]
# level = "info"      # trace, debug, info, warn, error
# format = "pretty"   # pretty, json, compact
"#;

    std::fs::write(&config_path, starter)?;
    println!("✅ Wrote {}", config_path.display());
    println!("   Set your bot token and announce channel, then run 'salewatch start'.");
    Ok(())
}
