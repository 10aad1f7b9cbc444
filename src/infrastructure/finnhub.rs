use crate::config::AppConfig;
use crate::domain::lookup::StockLookup;
use crate::domain::models::{SearchableItem, Symbol};
use crate::error::LookupError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Upper bound on rows returned for one query.
pub const MAX_RESULTS: usize = 15;

const USER_AGENT: &str = concat!("tickr/", env!("CARGO_PKG_VERSION"));

/// Symbol search against the Finnhub REST API (`GET /search`).
pub struct FinnhubLookup {
    client: Client,
    base_url: String,
    token: String,
    timeout: Duration,
    watchlist: Vec<Symbol>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<FinnhubSymbol>,
}

#[derive(Debug, Deserialize)]
struct FinnhubSymbol {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "displaySymbol")]
    display_symbol: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    exchange: Option<String>,
}

impl FinnhubSymbol {
    fn into_item(self) -> Option<SearchableItem> {
        let raw = if self.symbol.trim().is_empty() {
            self.display_symbol
        } else {
            self.symbol
        };
        let symbol = Symbol::new(&raw);
        if symbol.0.is_empty() {
            return None;
        }
        let name = non_empty(self.description).unwrap_or_else(|| symbol.0.clone());
        let exchange = self
            .exchange
            .and_then(non_empty)
            .unwrap_or_else(|| "US".to_string());
        let kind = non_empty(self.kind).unwrap_or_else(|| "Stock".to_string());
        Some(SearchableItem {
            symbol,
            name,
            exchange,
            kind,
            in_watchlist: false,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl FinnhubLookup {
    pub fn new(
        base_url: &str,
        token: &str,
        timeout: Duration,
        watchlist: Vec<Symbol>,
    ) -> Result<Self, LookupError> {
        if token.trim().is_empty() {
            return Err(LookupError::NotConfigured(
                "an API token is required".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
            timeout,
            watchlist,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, LookupError> {
        let token = config.api_token.as_deref().unwrap_or_default();
        let watchlist = config.watchlist.iter().map(|s| Symbol::new(s)).collect();
        Self::new(
            &config.api_base_url,
            token,
            config.lookup_timeout(),
            watchlist,
        )
    }

    fn classify(&self, err: reqwest::Error) -> LookupError {
        if err.is_timeout() {
            LookupError::Timeout(self.timeout)
        } else if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Http(err)
        }
    }
}

#[async_trait]
impl StockLookup for FinnhubLookup {
    async fn search(&self, query: &str) -> Result<Vec<SearchableItem>, LookupError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("token", self.token.as_str())])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: SearchResponse = response.json().await.map_err(|e| self.classify(e))?;
        let total = body.result.len();
        let items: Vec<SearchableItem> = body
            .result
            .into_iter()
            .filter_map(FinnhubSymbol::into_item)
            .take(MAX_RESULTS)
            .map(|item| {
                let in_watchlist = self.watchlist.contains(&item.symbol);
                item.watchlisted(in_watchlist)
            })
            .collect();
        debug!(query, total, returned = items.len(), "finnhub search");
        Ok(items)
    }

    fn backend_name(&self) -> &'static str {
        "finnhub"
    }
}
