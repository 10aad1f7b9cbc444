use crate::app::{
    action::{Action, UpdateResult},
    state::AppState,
};
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::{debug, warn};

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    let search = &mut state.search;
    match action {
        Action::OpenSearch => UpdateResult::Handled(search.open()),
        Action::CloseSearch => UpdateResult::Handled(search.close()),
        Action::ToggleSearch => UpdateResult::Handled(search.toggle()),
        Action::SetSearchQuery(text) => UpdateResult::Handled(search.set_query(text.clone())),
        Action::SearchInput(key) => {
            if !search.is_open() {
                return UpdateResult::Handled(None);
            }
            let mut query = search.query().to_string();
            match key.code {
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    query.clear();
                }
                KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return UpdateResult::Handled(None);
                }
                KeyCode::Char(c) => query.push(c),
                KeyCode::Backspace => {
                    if query.pop().is_none() {
                        return UpdateResult::Handled(None);
                    }
                }
                _ => return UpdateResult::Handled(None),
            }
            UpdateResult::Handled(search.set_query(query))
        }
        Action::SearchNext => {
            search.select_next();
            UpdateResult::Handled(None)
        }
        Action::SearchPrev => {
            search.select_prev();
            UpdateResult::Handled(None)
        }
        Action::SearchSelectCurrent => UpdateResult::Handled(search.select_current()),
        Action::SearchSelectIndex(idx) => UpdateResult::Handled(search.select_index(*idx)),
        Action::LookupDue { generation } => {
            let command = search.lookup_due(*generation);
            if command.is_none() {
                debug!(
                    generation,
                    current = search.generation(),
                    "ignoring superseded debounce signal"
                );
            }
            UpdateResult::Handled(command)
        }
        Action::LookupResolved {
            generation,
            outcome,
        } => {
            if let Err(err) = outcome {
                warn!(query = search.trimmed_query(), error = %err, "stock lookup failed");
            }
            if !search.apply_lookup(*generation, outcome.clone()) {
                debug!(
                    generation,
                    current = search.generation(),
                    "discarding stale lookup response"
                );
            }
            UpdateResult::Handled(None)
        }
        _ => UpdateResult::NotHandled,
    }
}
