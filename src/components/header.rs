use crate::app::state::AppState;
use crate::domain::models::Route;
use crate::theme::Theme;

use super::search_trigger::SearchTrigger;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const LOGO: &str = " ◆ TICKR ";
const SEP_RIGHT: &str = "\u{e0b0}";

pub struct Header<'a> {
    pub state: &'a AppState,
    pub theme: &'a Theme,
}

/// Where the trigger sits inside the header row.
pub fn trigger_rect(header: Rect, state: &AppState) -> Rect {
    let x = header.x + LOGO.chars().count() as u16 + 2;
    let width = SearchTrigger::width(&state.trigger).min(header.right().saturating_sub(x));
    Rect {
        x,
        y: header.y,
        width,
        height: header.height.min(1),
    }
}

fn route_text(route: &Route) -> String {
    match route {
        Route::Home => " Home ".to_string(),
        Route::Stock(symbol) => format!(" {symbol} "),
        Route::Unknown(path) => format!(" {path} "),
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let logo_bg = self.theme.header_logo.bg.unwrap_or(Color::Reset);
        let base_bg = self.theme.header.bg.unwrap_or(Color::Reset);
        let sep = Style::default().fg(logo_bg).bg(base_bg);

        Paragraph::new(Line::from(vec![
            Span::styled(LOGO, self.theme.header_logo),
            Span::styled(SEP_RIGHT, sep),
        ]))
        .style(self.theme.header)
        .render(area, buf);

        let trigger = trigger_rect(area, self.state);
        if trigger.width > 0 {
            SearchTrigger {
                config: &self.state.trigger,
                theme: self.theme,
            }
            .render(trigger, buf);
        }

        let route = route_text(&self.state.route);
        let route_x = trigger.right() + 2;
        if route_x < area.right() {
            buf.set_span(
                route_x,
                area.y,
                &Span::styled(route, self.theme.header_route),
                area.right() - route_x,
            );
        }

        let backend = format!(" {} ", self.state.lookup_backend);
        let backend_width = backend.chars().count() as u16;
        if area.width > route_x.saturating_sub(area.x) + backend_width {
            buf.set_span(
                area.right() - backend_width,
                area.y,
                &Span::styled(backend, self.theme.header_item),
                backend_width,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_rect_follows_logo() {
        let state = AppState::default();
        let rect = trigger_rect(Rect::new(0, 0, 80, 1), &state);
        assert_eq!(rect.x, 11);
        assert_eq!(rect.width, SearchTrigger::width(&state.trigger));
        assert_eq!(rect.height, 1);
    }

    #[test]
    fn test_route_text() {
        assert_eq!(route_text(&Route::Home), " Home ");
        assert_eq!(
            route_text(&Route::Stock(crate::domain::models::Symbol::new("aapl"))),
            " AAPL "
        );
    }
}
