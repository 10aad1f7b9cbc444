pub mod navigation;
pub mod search;
pub mod ui;
