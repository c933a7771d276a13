use crypto_news_bot::config::{BotConfig, ENV_CONFIG_PATH};
use serial_test::serial;
use std::fs;

const BOT_TOML: &str = r#"
hours_lookback = 2
min_significance_score = 3.0
max_articles = 4
dedup_path = "state/seen.json"
interval_secs = 3600

[[feeds]]
name = "CoinDesk"
url = "https://www.coindesk.com/arc/outboundfeeds/rss/"
credibility = 4

[[discord_webhooks]]
name = "Original Discord"
url = "https://discord.test/hook"

[translation]
enabled = false
"#;

fn clear_env() {
    for k in [
        ENV_CONFIG_PATH,
        "HOURS_LOOKBACK",
        "MIN_SIGNIFICANCE_SCORE",
        "MAX_ARTICLES_PER_RUN",
        "DISCORD_WEBHOOK_URL",
        "DISCORD_WEBHOOK_FFI",
        "TELEGRAM_BOT_TOKEN",
        "TELEGRAM_CHAT_ID",
        "OPENAI_API_KEY",
    ] {
        std::env::remove_var(k);
    }
}

#[test]
#[serial]
fn loads_file_named_by_env() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bot.toml");
    fs::write(&path, BOT_TOML).unwrap();
    std::env::set_var(ENV_CONFIG_PATH, &path);

    let cfg = BotConfig::load_default().unwrap();
    assert_eq!(cfg.hours_lookback, 2);
    assert_eq!(cfg.max_articles, 4);
    assert_eq!(cfg.interval_secs, Some(3600));
    assert_eq!(cfg.feeds.len(), 1);
    assert_eq!(cfg.discord_webhooks.len(), 1);
    assert!(!cfg.translation.is_active());
    assert_eq!(cfg.dedup_path.to_str(), Some("state/seen.json"));

    clear_env();
}

#[test]
#[serial]
fn env_values_override_the_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bot.toml");
    fs::write(&path, BOT_TOML).unwrap();
    std::env::set_var(ENV_CONFIG_PATH, &path);
    std::env::set_var("HOURS_LOOKBACK", "6");
    std::env::set_var("DISCORD_WEBHOOK_URL", "https://discord.test/hook");
    std::env::set_var("DISCORD_WEBHOOK_FFI", "https://discord.test/ffi");

    let cfg = BotConfig::load_default().unwrap();
    assert_eq!(cfg.hours_lookback, 6);
    // the file already names the first webhook
    assert_eq!(cfg.discord_webhooks.len(), 2);
    assert_eq!(cfg.discord_webhooks[1].name, "FFI Discord");

    clear_env();
}

#[test]
#[serial]
fn missing_env_path_is_fatal() {
    clear_env();
    std::env::set_var(ENV_CONFIG_PATH, "/definitely/not/here/bot.toml");
    assert!(BotConfig::load_default().is_err());
    clear_env();
}

#[test]
#[serial]
fn invalid_feed_credibility_is_fatal() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bot.toml");
    fs::write(
        &path,
        r#"
[[feeds]]
name = "Nowhere"
url = "https://nowhere.test/rss"
credibility = 0
"#,
    )
    .unwrap();
    std::env::set_var(ENV_CONFIG_PATH, &path);
    assert!(BotConfig::load_default().is_err());
    clear_env();
}
