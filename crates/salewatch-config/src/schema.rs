use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration — maps to `salewatch.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SalewatchConfig {
    pub bot: BotConfig,
    pub discord: DiscordConfig,
    pub storefront: StorefrontConfig,
    pub logging: LoggingConfig,
}

// ── Bot ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Directory holding the wishlist and tracked-product stores.
    /// Relative paths resolve against `~/.salewatch/`.
    pub data_dir: PathBuf,
    /// Channel ID where sale alerts are announced.
    pub announce_channel: String,
    /// Seconds between price-scan passes.
    pub poll_interval_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            announce_channel: String::new(),
            poll_interval_secs: 1800,
        }
    }
}

// ── Discord ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token. Can also be set via the DISCORD_TOKEN environment
    /// variable; the config file takes priority.
    pub token: Option<String>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self { token: None }
    }
}

// ── Storefront ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Base URL of the storefront pricing API.
    pub api_base: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base: "https://store.steampowered.com/api".into(),
            timeout_secs: 10,
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Default for root ───────────────────────────────────────────

impl Default for SalewatchConfig {
    fn default() -> Self {
        Self {
            bot: BotConfig::default(),
            discord: DiscordConfig::default(),
            storefront: StorefrontConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
            WarningSeverity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl SalewatchConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    ///
    /// Token and announce-channel absence stay warnings here so commands
    /// like `salewatch config` and `salewatch init` work on a fresh
    /// install; `salewatch start` rejects both before connecting.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Poll interval ───
        if self.bot.poll_interval_secs == 0 {
            warnings.push(ConfigWarning {
                field: "bot.poll_interval_secs".into(),
                message: "poll interval is 0 — the bot would scan in a busy loop".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 1800 (30 minutes)".into()),
            });
        } else if self.bot.poll_interval_secs < 60 {
            warnings.push(ConfigWarning {
                field: "bot.poll_interval_secs".into(),
                message: format!(
                    "poll interval is {}s — this hammers the pricing API",
                    self.bot.poll_interval_secs
                ),
                severity: WarningSeverity::Warning,
                hint: Some("Intervals under a minute are rarely useful; try 1800".into()),
            });
        }

        // ── Announce channel ───
        if self.bot.announce_channel.is_empty() {
            warnings.push(ConfigWarning {
                field: "bot.announce_channel".into(),
                message: "no announce channel configured — sale alerts have nowhere to go".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Set bot.announce_channel to a channel ID, or SALEWATCH_CHANNEL".into()),
            });
        } else if !self.bot.announce_channel.chars().all(|c| c.is_ascii_digit()) {
            warnings.push(ConfigWarning {
                field: "bot.announce_channel".into(),
                message: format!(
                    "'{}' does not look like a channel ID",
                    self.bot.announce_channel
                ),
                severity: WarningSeverity::Warning,
                hint: Some("Channel IDs are numeric snowflakes, e.g. 1300862501407162449".into()),
            });
        }

        // ── Token ───
        if self.discord.token.is_none() {
            warnings.push(ConfigWarning {
                field: "discord.token".into(),
                message: "no bot token configured".into(),
                severity: WarningSeverity::Warning,
                hint: Some(
                    "Set discord.token in salewatch.toml or export DISCORD_TOKEN".into(),
                ),
            });
        }

        // ── Storefront ───
        if self.storefront.api_base.is_empty() {
            warnings.push(ConfigWarning {
                field: "storefront.api_base".into(),
                message: "API base URL is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 'https://store.steampowered.com/api'".into()),
            });
        }
        if self.storefront.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                field: "storefront.timeout_secs".into(),
                message: "timeout is 0 — price lookups would never complete".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 10".into()),
            });
        }

        // ── Logging level ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        // ── Logging format ───
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // Check for hard errors
        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
