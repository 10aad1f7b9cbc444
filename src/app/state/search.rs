use crate::app::command::Command;
use crate::domain::models::SearchableItem;
use std::sync::Arc;

/// Number of seed items shown while the query is blank.
pub const SEED_DISPLAY_LIMIT: usize = 10;

/// State of the search palette for one mounted instance.
///
/// Transitions that need timers or I/O hand back a [`Command`] for the runtime;
/// the session itself never spawns anything. Every transition that makes an
/// in-flight lookup obsolete bumps `generation`, and only a response carrying
/// the current generation is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSession {
    is_open: bool,
    query: String,
    results: Vec<SearchableItem>,
    is_loading: bool,
    selected_index: usize,
    generation: u64,
    seed: Arc<[SearchableItem]>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SearchSession {
    pub fn new(seed: impl Into<Arc<[SearchableItem]>>) -> Self {
        let seed = seed.into();
        Self {
            is_open: false,
            query: String::new(),
            results: seed_head(&seed),
            is_loading: false,
            selected_index: 0,
            generation: 0,
            seed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The literal text as typed, whitespace included.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    pub fn has_query(&self) -> bool {
        !self.trimmed_query().is_empty()
    }

    pub fn results(&self) -> &[SearchableItem] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn seed(&self) -> &[SearchableItem] {
        &self.seed
    }

    pub fn selected_item(&self) -> Option<&SearchableItem> {
        if self.is_loading {
            return None;
        }
        self.results.get(self.selected_index)
    }

    pub fn open(&mut self) -> Option<Command> {
        if self.is_open {
            return None;
        }
        self.reset();
        self.is_open = true;
        tracing::debug!("search palette opened");
        None
    }

    pub fn close(&mut self) -> Option<Command> {
        if !self.is_open {
            return None;
        }
        self.is_open = false;
        self.is_loading = false;
        self.bump_generation();
        tracing::debug!("search palette closed");
        Some(Command::CancelLookup)
    }

    pub fn toggle(&mut self) -> Option<Command> {
        if self.is_open {
            self.close()
        } else {
            self.open()
        }
    }

    /// Blank text restores the seed list synchronously and cancels any pending
    /// lookup. Anything else marks the session loading and asks for a
    /// debounced lookup.
    pub fn set_query(&mut self, text: impl Into<String>) -> Option<Command> {
        if !self.is_open {
            return None;
        }
        self.query = text.into();
        self.selected_index = 0;
        self.bump_generation();

        if self.has_query() {
            self.is_loading = true;
            Some(Command::ScheduleLookup {
                generation: self.generation,
            })
        } else {
            self.results = seed_head(&self.seed);
            self.is_loading = false;
            Some(Command::CancelLookup)
        }
    }

    /// Called when the debounce window scheduled at `generation` elapses.
    /// A signal from an earlier generation is ignored; the query it was armed
    /// for has since changed and a newer window is running.
    pub fn lookup_due(&self, generation: u64) -> Option<Command> {
        if !self.is_open || generation != self.generation || !self.has_query() {
            return None;
        }
        Some(Command::Lookup {
            query: self.trimmed_query().to_string(),
            generation: self.generation,
        })
    }

    /// Applies a lookup response. Failures become an empty result set.
    /// Returns `false` when the response was stale and discarded.
    pub fn apply_lookup(
        &mut self,
        generation: u64,
        outcome: Result<Vec<SearchableItem>, String>,
    ) -> bool {
        if !self.is_open || generation != self.generation || !self.has_query() {
            return false;
        }
        self.results = outcome.unwrap_or_default();
        self.is_loading = false;
        self.selected_index = 0;
        true
    }

    pub fn select(&mut self, item: &SearchableItem) -> Option<Command> {
        let path = item.detail_path();
        self.reset();
        self.is_open = false;
        tracing::debug!(%path, "search palette selection");
        Some(Command::Batch(vec![
            Command::CancelLookup,
            Command::Navigate(path),
        ]))
    }

    pub fn select_current(&mut self) -> Option<Command> {
        let item = self.selected_item().cloned()?;
        self.select(&item)
    }

    pub fn select_index(&mut self, index: usize) -> Option<Command> {
        if self.is_loading {
            return None;
        }
        let item = self.results.get(index).cloned()?;
        self.select(&item)
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.results.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.results.is_empty() {
            self.selected_index = if self.selected_index == 0 {
                self.results.len() - 1
            } else {
                self.selected_index - 1
            };
        }
    }

    fn reset(&mut self) {
        self.query.clear();
        self.results = seed_head(&self.seed);
        self.is_loading = false;
        self.selected_index = 0;
        self.bump_generation();
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

fn seed_head(seed: &[SearchableItem]) -> Vec<SearchableItem> {
    seed.iter().take(SEED_DISPLAY_LIMIT).cloned().collect()
}
