use crate::domain::models::SearchableItem;
use crate::error::LookupError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockLookup: Send + Sync {
    // Ordered matches for an already-trimmed, non-empty query
    async fn search(&self, query: &str) -> Result<Vec<SearchableItem>, LookupError>;

    // Short name shown in the header, e.g. "finnhub"
    fn backend_name(&self) -> &'static str;
}

#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}
