#[cfg(test)]
mod tests {
    use salewatch_config::ConfigLoader;
    use salewatch_config::schema::*;
    use std::io::Write;

    // ── Default tests ──────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = SalewatchConfig::default();
        assert_eq!(config.bot.poll_interval_secs, 1800);
        assert!(config.bot.announce_channel.is_empty());
        assert_eq!(config.bot.data_dir, std::path::PathBuf::from("data"));
        assert!(config.discord.token.is_none());
    }

    #[test]
    fn test_storefront_config_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api_base, "https://store.steampowered.com/api");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "pretty");
    }

    // ── TOML roundtrip tests ───────────────────────────────────

    #[test]
    fn test_config_toml_roundtrip() {
        let config = SalewatchConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: SalewatchConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(restored.bot.poll_interval_secs, config.bot.poll_interval_secs);
        assert_eq!(restored.storefront.api_base, config.storefront.api_base);
        assert_eq!(restored.logging.level, config.logging.level);
    }

    #[test]
    fn test_partial_toml_applies_defaults() {
        let toml_str = r#"
[bot]
announce_channel = "1300862501407162449"
poll_interval_secs = 600

[discord]
token = "abc123"
"#;
        let config: SalewatchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot.announce_channel, "1300862501407162449");
        assert_eq!(config.bot.poll_interval_secs, 600);
        assert_eq!(config.discord.token.as_deref(), Some("abc123"));
        // Defaults should fill in
        assert_eq!(config.storefront.api_base, "https://store.steampowered.com/api");
        assert_eq!(config.logging.level, "info");
    }

    // ── Validation tests ───────────────────────────────────────

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let mut config = SalewatchConfig::default();
        config.bot.poll_interval_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("bot.poll_interval_secs"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = SalewatchConfig::default();
        config.storefront.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_warns_on_missing_token() {
        let config = SalewatchConfig::default();
        let warnings = config.validate().unwrap();
        assert!(
            warnings
                .iter()
                .any(|w| w.field == "discord.token" && w.severity == WarningSeverity::Warning)
        );
    }

    #[test]
    fn test_validate_warns_on_non_numeric_channel() {
        let mut config = SalewatchConfig::default();
        config.bot.announce_channel = "general".into();
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.field == "bot.announce_channel"));
    }

    // ── ConfigLoader tests ─────────────────────────────────────

    #[test]
    fn test_config_loader_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("salewatch.toml");
        let mut f = std::fs::File::create(&config_path).unwrap();
        writeln!(
            f,
            r#"
[bot]
announce_channel = "42"
poll_interval_secs = 900

[storefront]
timeout_secs = 5
"#
        )
        .unwrap();

        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        let config = loader.get();
        assert_eq!(config.bot.announce_channel, "42");
        assert_eq!(config.bot.poll_interval_secs, 900);
        assert_eq!(config.storefront.timeout_secs, 5);
    }

    #[test]
    fn test_config_loader_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("salewatch.toml");

        std::fs::write(
            &config_path,
            r#"
[bot]
poll_interval_secs = 300
"#,
        )
        .unwrap();

        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        assert_eq!(loader.get().bot.poll_interval_secs, 300);

        std::fs::write(
            &config_path,
            r#"
[bot]
poll_interval_secs = 3600
"#,
        )
        .unwrap();

        loader.reload().unwrap();
        assert_eq!(loader.get().bot.poll_interval_secs, 3600);
    }

    #[test]
    fn test_config_loader_shared_sees_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("salewatch.toml");
        std::fs::write(&config_path, "[bot]\npoll_interval_secs = 120\n").unwrap();

        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        let shared = loader.shared();
        assert_eq!(shared.read().bot.poll_interval_secs, 120);

        std::fs::write(&config_path, "[bot]\npoll_interval_secs = 240\n").unwrap();
        loader.reload().unwrap();
        assert_eq!(shared.read().bot.poll_interval_secs, 240);
    }

    // ── JSON roundtrip ─────────────────────────────────────────

    #[test]
    fn test_config_json_roundtrip() {
        let config = SalewatchConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: SalewatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.bot.poll_interval_secs, config.bot.poll_interval_secs);
    }
}
