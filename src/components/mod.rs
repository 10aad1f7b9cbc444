pub mod footer;
pub mod header;
pub mod modals;
pub mod search_trigger;
pub mod stock_detail;
pub mod welcome;
