use crate::config::AppConfig;
use crate::domain::lookup::StockLookup;
use crate::domain::models::SearchableItem;
use crate::error::LookupError;
use async_trait::async_trait;

use super::finnhub::MAX_RESULTS;

/// Offline lookup over a fixed list of instruments.
pub struct CatalogLookup {
    items: Vec<SearchableItem>,
}

const BUILTIN: &[(&str, &str, &str, &str)] = &[
    ("AMD", "Advanced Micro Devices, Inc.", "NASDAQ", "Common Stock"),
    ("INTC", "Intel Corporation", "NASDAQ", "Common Stock"),
    ("IBM", "International Business Machines", "NYSE", "Common Stock"),
    ("DIS", "The Walt Disney Company", "NYSE", "Common Stock"),
    ("KO", "The Coca-Cola Company", "NYSE", "Common Stock"),
    ("PEP", "PepsiCo, Inc.", "NASDAQ", "Common Stock"),
    ("WMT", "Walmart Inc.", "NYSE", "Common Stock"),
    ("BA", "The Boeing Company", "NYSE", "Common Stock"),
    ("NKE", "NIKE, Inc.", "NYSE", "Common Stock"),
    ("PYPL", "PayPal Holdings, Inc.", "NASDAQ", "Common Stock"),
    ("UBER", "Uber Technologies, Inc.", "NYSE", "Common Stock"),
    ("SHOP", "Shopify Inc.", "NYSE", "Common Stock"),
    ("SPOT", "Spotify Technology S.A.", "NYSE", "Common Stock"),
    ("COIN", "Coinbase Global, Inc.", "NASDAQ", "Common Stock"),
    ("BAC", "Bank of America Corporation", "NYSE", "Common Stock"),
    ("XOM", "Exxon Mobil Corporation", "NYSE", "Common Stock"),
    ("PFE", "Pfizer Inc.", "NYSE", "Common Stock"),
    ("T", "AT&T Inc.", "NYSE", "Common Stock"),
    ("SPY", "SPDR S&P 500 ETF Trust", "NYSE ARCA", "ETF"),
    ("QQQ", "Invesco QQQ Trust", "NASDAQ", "ETF"),
];

impl CatalogLookup {
    pub fn new(items: Vec<SearchableItem>) -> Self {
        Self { items }
    }

    /// The configured seed followed by the built-in list, deduplicated by
    /// symbol, with watchlist membership applied.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut items = config.seed_items();
        for (symbol, name, exchange, kind) in BUILTIN {
            let item = SearchableItem::new(symbol, name, exchange, kind);
            if items.iter().all(|known| known.symbol != item.symbol) {
                let in_watchlist = config.is_watchlisted(&item.symbol);
                items.push(item.watchlisted(in_watchlist));
            }
        }
        Self::new(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// Lower is better; None means no match.
fn rank(item: &SearchableItem, needle: &str) -> Option<u8> {
    let symbol = item.symbol.0.to_lowercase();
    let name = item.name.to_lowercase();
    if symbol == needle {
        Some(0)
    } else if symbol.starts_with(needle) {
        Some(1)
    } else if name.starts_with(needle) || name.split_whitespace().any(|w| w.starts_with(needle)) {
        Some(2)
    } else if symbol.contains(needle) || name.contains(needle) {
        Some(3)
    } else {
        None
    }
}

#[async_trait]
impl StockLookup for CatalogLookup {
    async fn search(&self, query: &str) -> Result<Vec<SearchableItem>, LookupError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let mut matches: Vec<(u8, &SearchableItem)> = self
            .items
            .iter()
            .filter_map(|item| rank(item, &needle).map(|r| (r, item)))
            .collect();
        // Stable: equal ranks keep catalog order.
        matches.sort_by_key(|(r, _)| *r);
        Ok(matches
            .into_iter()
            .take(MAX_RESULTS)
            .map(|(_, item)| item.clone())
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "offline"
    }
}
