use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(symbol: &str) -> Self {
        Self(symbol.trim().to_uppercase())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tradable instrument as shown in the search palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableItem {
    pub symbol: Symbol,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub in_watchlist: bool,
}

impl SearchableItem {
    pub fn new(symbol: &str, name: &str, exchange: &str, kind: &str) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            name: name.to_string(),
            exchange: exchange.to_string(),
            kind: kind.to_string(),
            in_watchlist: false,
        }
    }

    #[must_use]
    pub fn watchlisted(mut self, in_watchlist: bool) -> Self {
        self.in_watchlist = in_watchlist;
        self
    }

    /// Falls back to the symbol when the backend returned no name.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.symbol.0
        } else {
            &self.name
        }
    }

    /// `SYMBOL | EXCHANGE | KIND`
    pub fn summary_line(&self) -> String {
        format!("{} | {} | {}", self.symbol, self.exchange, self.kind)
    }

    pub fn detail_path(&self) -> String {
        stock_path(&self.symbol)
    }
}

pub fn stock_path(symbol: &Symbol) -> String {
    format!("/stocks/{}", symbol.0)
}

/// Where the main view currently points.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Stock(Symbol),
    Unknown(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Route::Home;
        }
        match trimmed.strip_prefix("/stocks/") {
            Some(symbol) if !symbol.is_empty() && !symbol.contains('/') => {
                Route::Stock(Symbol(symbol.to_string()))
            }
            _ => Route::Unknown(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Stock(symbol) => stock_path(symbol),
            Route::Unknown(path) => path.clone(),
        }
    }
}
