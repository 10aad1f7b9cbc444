use crate::app::state::{AppMode, AppState};
use crate::components::footer::Footer;
use crate::components::header::Header;
use crate::components::modals::helpers::dim_area;
use crate::components::modals::{HelpModal, SearchPaletteModal};
use crate::components::stock_detail::StockDetail;
use crate::components::welcome::Welcome;
use crate::domain::models::Route;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct AppLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub fn get_layout(area: Rect) -> AppLayout {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    AppLayout {
        header: main[0],
        body: main[1],
        footer: main[2],
    }
}

pub fn draw(f: &mut Frame, app_state: &AppState) {
    let area = f.area();
    if area.width == 0 || area.height == 0 {
        return;
    }
    let theme = &app_state.theme;
    let layout = get_layout(area);

    if layout.header.height > 0 {
        f.render_widget(
            Header {
                state: app_state,
                theme,
            },
            layout.header,
        );
    }

    if layout.body.height > 0 {
        match &app_state.route {
            Route::Home => f.render_widget(
                Welcome {
                    app_state,
                    theme,
                },
                layout.body,
            ),
            Route::Stock(symbol) => f.render_widget(
                StockDetail {
                    symbol,
                    app_state,
                    theme,
                },
                layout.body,
            ),
            Route::Unknown(path) => f.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("Nothing at ", theme.dimmed),
                    Span::styled(path.as_str(), theme.header_item),
                ]))
                .alignment(Alignment::Center),
                layout.body,
            ),
        }
    }

    if layout.footer.height > 0 {
        f.render_widget(
            Footer {
                state: app_state,
                theme,
            },
            layout.footer,
        );
    }

    if app_state.search.is_open() {
        dim_area(f.buffer_mut(), area);
        f.render_widget(
            SearchPaletteModal {
                theme,
                session: &app_state.search,
                spinner: &app_state.spinner,
            },
            area,
        );
    } else if app_state.mode == AppMode::Help {
        dim_area(f.buffer_mut(), area);
        f.render_widget(HelpModal { theme }, area);
    }
}
