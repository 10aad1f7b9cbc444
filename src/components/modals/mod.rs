pub mod help;
pub mod helpers;
pub mod search_palette;

pub use help::HelpModal;
pub use search_palette::SearchPaletteModal;
