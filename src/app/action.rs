use crate::app::command::Command;
use crate::domain::models::SearchableItem;

#[derive(Debug, Clone)]
pub enum UpdateResult {
    Handled(Option<Command>),
    NotHandled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // --- System / Terminal ---
    Tick,
    Resize(u16, u16),
    Quit,
    ToggleHelp,
    CancelMode, // ESC outside the palette

    // --- Search Palette ---
    OpenSearch,                         // Trigger affordance activated
    CloseSearch,                        // ESC / click outside the overlay
    ToggleSearch,                       // Global Ctrl/Cmd+K
    SearchInput(crossterm::event::KeyEvent), // Typing into the palette
    SetSearchQuery(String),             // Replace the query outright (paste, clear)
    SearchNext,                         // Move the highlight down
    SearchPrev,                         // Move the highlight up
    SearchSelectCurrent,                // ENTER on the highlighted row
    SearchSelectIndex(usize),           // Click on a row

    // --- Async Results ---
    LookupDue { generation: u64 }, // Debounce window elapsed
    LookupResolved {
        generation: u64,
        outcome: Result<Vec<SearchableItem>, String>,
    },

    // --- Navigation ---
    Navigated(String), // Navigator moved to a path
    GoHome,
}
