use crate::app::{
    action::{Action, UpdateResult},
    command::Command,
    state::AppState,
};
use crate::domain::models::Route;

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    match action {
        Action::Navigated(path) => {
            let route = Route::parse(path);
            if let Route::Stock(symbol) = &route {
                state.remember(symbol.clone());
            }
            state.status_message = Some(format!("Opened {}", route.path()));
            state.route = route;
            UpdateResult::Handled(None)
        }
        Action::GoHome => {
            if state.route == Route::Home {
                return UpdateResult::Handled(None);
            }
            UpdateResult::Handled(Some(Command::Navigate(Route::Home.path())))
        }
        _ => UpdateResult::NotHandled,
    }
}
