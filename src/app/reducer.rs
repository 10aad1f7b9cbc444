use super::{
    action::{Action, UpdateResult},
    command::Command,
    features,
    state::AppState,
};

type Feature = fn(&mut AppState, &Action) -> UpdateResult;

const FEATURES: [Feature; 3] = [
    features::search::update,
    features::navigation::update,
    features::ui::update,
];

pub fn update(state: &mut AppState, action: Action) -> Option<Command> {
    for feature in FEATURES {
        if let UpdateResult::Handled(command) = feature(state, &action) {
            return command;
        }
    }
    tracing::trace!(?action, "unhandled action");
    None
}
