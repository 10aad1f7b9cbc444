use crate::config::{AppConfig, TriggerConfig};
use crate::domain::models::{Route, Symbol};

pub mod search;

// Re-exports
pub use search::{SearchSession, SEED_DISPLAY_LIMIT};

/// How many recently viewed symbols the home screen remembers.
pub const RECENT_LIMIT: usize = 10;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal, // Browsing the current route
    Help,   // Showing the help overlay
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    // --- Connectivity & Status ---
    pub should_quit: bool,
    pub mode: AppMode,
    pub status_message: Option<String>,
    pub lookup_backend: String,

    // --- Search Palette ---
    pub search: SearchSession,
    pub trigger: TriggerConfig,

    // --- Navigation ---
    pub route: Route,
    pub recent: Vec<Symbol>,

    // --- Animation ---
    pub frame_count: u64,
    pub spinner: String,

    // --- Config ---
    pub palette_type: crate::theme::PaletteType,
    pub theme: crate::theme::Theme,
}

impl AppState {
    #[must_use]
    pub fn new(config: &AppConfig, lookup_backend: &str) -> Self {
        Self {
            lookup_backend: lookup_backend.to_string(),
            search: SearchSession::new(config.seed_items()),
            trigger: config.trigger_config(),
            palette_type: config.theme,
            theme: crate::theme::Theme::from_palette_type(config.theme),
            ..Default::default()
        }
    }

    /// Records a visit, most recent first, without duplicates.
    pub fn remember(&mut self, symbol: Symbol) {
        self.recent.retain(|s| *s != symbol);
        self.recent.insert(0, symbol);
        self.recent.truncate(RECENT_LIMIT);
    }

    pub fn advance_spinner(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
        let frame = (self.frame_count % SPINNER_FRAMES.len() as u64) as usize;
        self.spinner = SPINNER_FRAMES[frame].to_string();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Normal,
            status_message: None,
            lookup_backend: "offline".to_string(),
            search: SearchSession::default(),
            trigger: TriggerConfig::default(),
            route: Route::Home,
            recent: Vec::new(),
            frame_count: 0,
            spinner: SPINNER_FRAMES[0].to_string(),
            palette_type: crate::theme::PaletteType::CatppuccinMocha,
            theme: crate::theme::Theme::default(),
        }
    }
}
