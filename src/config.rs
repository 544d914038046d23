use anyhow::{Context, Result};
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use crate::rules::{KeywordRule, KeywordRules};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Keyword table; the built-in table is used when omitted
    #[serde(default)]
    pub rules: Option<Vec<KeywordRule>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Public URL Telegram should deliver updates to
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Custom Bot API server; defaults to api.telegram.org
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub register_webhook_on_start: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            webhook_url: None,
            api_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            register_webhook_on_start: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load the config file, apply environment overrides and validate.
    /// A missing file is tolerated so a bare `TELEGRAM_TOKEN` is enough to run.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// `load` with an explicit environment lookup
    pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)?
        } else {
            warn!(
                "Config file {} not found, using defaults and environment",
                path.display()
            );
            Config::default()
        };

        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// `TELEGRAM_TOKEN` and `WEBHOOK_URL` take precedence over the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TELEGRAM_TOKEN").filter(|v| !v.trim().is_empty()) {
            self.telegram.bot_token = token;
        }
        if let Some(url) = lookup("WEBHOOK_URL").filter(|v| !v.trim().is_empty()) {
            self.telegram.webhook_url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            anyhow::bail!("TELEGRAM_TOKEN not set in environment variables or [telegram] bot_token");
        }
        if let Some(url) = &self.telegram.webhook_url {
            Url::parse(url).with_context(|| format!("Invalid webhook_url: {}", url))?;
        }
        if let Some(url) = &self.telegram.api_url {
            Url::parse(url).with_context(|| format!("Invalid api_url: {}", url))?;
        }
        if self.telegram.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        self.keyword_rules()?;
        Ok(())
    }

    pub fn keyword_rules(&self) -> Result<KeywordRules> {
        match &self.rules {
            Some(rules) => KeywordRules::new(rules.clone()).context("Invalid [[rules]] table"),
            None => Ok(KeywordRules::default()),
        }
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.telegram.webhook_url.as_deref()
    }
}
