use crate::domain::models::{SearchableItem, Symbol};
use crate::error::ConfigError;
use crate::theme::PaletteType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: i64 = 300;
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_API_BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerVariant {
    #[default]
    Button,
    Text,
}

/// How the search palette's entry point is drawn in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerConfig {
    pub variant: TriggerVariant,
    pub label: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            variant: TriggerVariant::Button,
            label: "Add stock".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Quiet period before a typed query hits the backend. Negative values
    /// are treated as zero.
    pub debounce_ms: i64,
    pub lookup_timeout_secs: u64,
    pub trigger: TriggerVariant,
    pub label: Option<String>,
    pub theme: PaletteType,
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub watchlist: Vec<String>,
    pub seed: Vec<SearchableItem>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
            trigger: TriggerVariant::Button,
            label: None,
            theme: PaletteType::CatppuccinMocha,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            watchlist: Vec::new(),
            seed: default_seed(),
        }
    }
}

impl AppConfig {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.debounce_ms).unwrap_or(0))
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn trigger_config(&self) -> TriggerConfig {
        let label = match (&self.label, self.trigger) {
            (Some(label), _) if !label.trim().is_empty() => label.clone(),
            (_, TriggerVariant::Button) => "Add stock".to_string(),
            (_, TriggerVariant::Text) => "Search".to_string(),
        };
        TriggerConfig {
            variant: self.trigger,
            label,
        }
    }

    pub fn is_watchlisted(&self, symbol: &Symbol) -> bool {
        self.watchlist
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(&symbol.0))
    }

    /// Seed items with watchlist membership applied.
    pub fn seed_items(&self) -> Vec<SearchableItem> {
        self.seed
            .iter()
            .map(|item| {
                let in_watchlist = item.in_watchlist || self.is_watchlisted(&item.symbol);
                item.clone().watchlisted(in_watchlist)
            })
            .collect()
    }

    pub fn has_api_token(&self) -> bool {
        self.api_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup_timeout_secs == 0 {
            return Err(ConfigError::invalid("lookup_timeout_secs must be positive"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::invalid("api_base_url is required"));
        }
        if let Some(item) = self.seed.iter().find(|item| item.symbol.0.trim().is_empty()) {
            return Err(ConfigError::invalid(format!(
                "seed entry '{}' has an empty symbol",
                item.name
            )));
        }
        Ok(())
    }
}

pub fn config_dir() -> Option<PathBuf> {
    home::home_dir().map(|mut path| {
        path.push(".config");
        path.push("tickr");
        path
    })
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// A missing file yields the defaults; a present but broken file is an error.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_from(path),
        None => match default_config_path() {
            Some(path) => load_from(&path),
            None => Ok(AppConfig::default()),
        },
    }
}

fn default_seed() -> Vec<SearchableItem> {
    [
        ("AAPL", "Apple Inc.", "NASDAQ"),
        ("MSFT", "Microsoft Corporation", "NASDAQ"),
        ("GOOGL", "Alphabet Inc.", "NASDAQ"),
        ("AMZN", "Amazon.com, Inc.", "NASDAQ"),
        ("NVDA", "NVIDIA Corporation", "NASDAQ"),
        ("META", "Meta Platforms, Inc.", "NASDAQ"),
        ("TSLA", "Tesla, Inc.", "NASDAQ"),
        ("NFLX", "Netflix, Inc.", "NASDAQ"),
        ("ORCL", "Oracle Corporation", "NYSE"),
        ("CRM", "Salesforce, Inc.", "NYSE"),
        ("JPM", "JPMorgan Chase & Co.", "NYSE"),
        ("V", "Visa Inc.", "NYSE"),
    ]
    .iter()
    .map(|(symbol, name, exchange)| SearchableItem::new(symbol, name, exchange, "Common Stock"))
    .collect()
}
