pub mod catalog;
pub mod finnhub;

pub use catalog::CatalogLookup;
pub use finnhub::FinnhubLookup;
