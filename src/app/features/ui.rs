use crate::app::{
    action::{Action, UpdateResult},
    state::{AppMode, AppState},
};

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    match action {
        Action::Tick => {
            state.advance_spinner();
            UpdateResult::Handled(None)
        }
        Action::Quit => {
            state.should_quit = true;
            UpdateResult::Handled(None)
        }
        Action::Resize(_, _) => UpdateResult::Handled(None),
        Action::ToggleHelp => {
            state.mode = if state.mode == AppMode::Help {
                AppMode::Normal
            } else {
                AppMode::Help
            };
            UpdateResult::Handled(None)
        }
        Action::CancelMode => {
            state.mode = AppMode::Normal;
            state.status_message = None;
            UpdateResult::Handled(None)
        }
        _ => UpdateResult::NotHandled,
    }
}
