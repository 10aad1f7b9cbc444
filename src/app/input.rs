use crate::app::{
    action::Action,
    state::{AppMode, AppState},
    ui,
};
use crate::components::header::trigger_rect;
use crate::components::modals::helpers::contains;
use crate::components::modals::search_palette::{palette_layout, row_at};
use crate::domain::models::Route;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use ratatui::layout::{Rect, Size};

pub fn map_event_to_action(
    event: Event,
    app_state: &AppState,
    terminal_size: Size,
) -> Option<Action> {
    let area = Rect::new(0, 0, terminal_size.width, terminal_size.height);

    if let Event::Resize(w, h) = event {
        return Some(Action::Resize(w, h));
    }
    if let Event::Key(key) = &event {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }
    }

    if app_state.search.is_open() {
        return map_palette_event(event, app_state, area);
    }

    match app_state.mode {
        AppMode::Help => match event {
            Event::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    Some(Action::ToggleHelp)
                }
                _ => None,
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                Some(Action::ToggleHelp)
            }
            _ => None,
        },
        AppMode::Normal => match event {
            Event::Key(key) => map_normal_key(key, app_state),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    let header = ui::get_layout(area).header;
                    contains(trigger_rect(header, app_state), mouse.column, mouse.row)
                        .then_some(Action::OpenSearch)
                }
                _ => None,
            },
            _ => None,
        },
    }
}

fn map_normal_key(key: KeyEvent, app_state: &AppState) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') | KeyCode::Char('s') => Some(Action::OpenSearch),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('h') | KeyCode::Backspace if app_state.route != Route::Home => {
            Some(Action::GoHome)
        }
        KeyCode::Esc if app_state.route != Route::Home => Some(Action::GoHome),
        KeyCode::Esc => Some(Action::CancelMode),
        _ => None,
    }
}

fn map_palette_event(event: Event, app_state: &AppState, area: Rect) -> Option<Action> {
    match event {
        Event::Key(key) => {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Esc => Some(Action::CloseSearch),
                KeyCode::Enter => Some(Action::SearchSelectCurrent),
                KeyCode::Up | KeyCode::BackTab => Some(Action::SearchPrev),
                KeyCode::Down | KeyCode::Tab => Some(Action::SearchNext),
                KeyCode::Char('p') if ctrl => Some(Action::SearchPrev),
                KeyCode::Char('n') if ctrl => Some(Action::SearchNext),
                _ => Some(Action::SearchInput(key)),
            }
        }
        Event::Paste(text) => {
            let pasted: String = text.chars().filter(|c| !c.is_control()).collect();
            Some(Action::SetSearchQuery(format!(
                "{}{pasted}",
                app_state.search.query()
            )))
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(idx) = row_at(area, &app_state.search, mouse.column, mouse.row) {
                    Some(Action::SearchSelectIndex(idx))
                } else if contains(palette_layout(area).modal, mouse.column, mouse.row) {
                    None
                } else {
                    Some(Action::CloseSearch)
                }
            }
            MouseEventKind::ScrollUp => Some(Action::SearchPrev),
            MouseEventKind::ScrollDown => Some(Action::SearchNext),
            _ => None,
        },
        _ => None,
    }
}
