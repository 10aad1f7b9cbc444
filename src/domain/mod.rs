pub mod lookup;
pub mod models;
