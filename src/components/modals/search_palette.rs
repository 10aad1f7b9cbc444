use crate::app::state::SearchSession;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Widget},
};

use super::helpers::{draw_drop_shadow, top_anchored_rect};

pub const PLACEHOLDER: &str = "Search stocks...";
const WATCHLIST_MARKER: &str = "★";
const NAME_WIDTH: usize = 18;

/// Screen regions of the open palette. Rendering and mouse hit-testing both
/// derive from this so they cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteLayout {
    pub modal: Rect,
    pub input: Rect,
    pub separator: Rect,
    pub heading: Rect,
    pub list: Rect,
}

pub fn palette_layout(area: Rect) -> PaletteLayout {
    let modal = top_anchored_rect(70, 60, 2, 18, area);
    let inner = Block::default().borders(Borders::ALL).inner(modal);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Query input
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Heading
            Constraint::Min(0),    // Rows
        ])
        .split(inner);

    PaletteLayout {
        modal,
        input: chunks[0],
        separator: chunks[1],
        heading: chunks[2],
        list: chunks[3],
    }
}

/// First visible row, keeping the highlighted row on screen.
pub fn list_offset(selected: usize, visible_rows: u16) -> usize {
    let visible = usize::from(visible_rows.max(1));
    selected.saturating_sub(visible - 1)
}

fn name_column(name: &str) -> String {
    let mut column: String = name.chars().take(NAME_WIDTH).collect();
    let width = column.chars().count();
    column.extend(std::iter::repeat(' ').take(NAME_WIDTH - width));
    column
}

pub fn list_heading(session: &SearchSession) -> String {
    if session.is_loading() {
        "Loading stocks...".to_string()
    } else if !session.has_query() {
        if session.results().is_empty() {
            "No stocks available".to_string()
        } else {
            format!("Popular stocks ({})", session.results().len())
        }
    } else if session.results().is_empty() {
        "No results found".to_string()
    } else {
        format!("Search results ({})", session.results().len())
    }
}

/// Maps a click inside the list region to a result index.
pub fn row_at(area: Rect, session: &SearchSession, column: u16, row: u16) -> Option<usize> {
    if session.is_loading() {
        return None;
    }
    let list = palette_layout(area).list;
    if !super::helpers::contains(list, column, row) {
        return None;
    }
    let index = list_offset(session.selected_index(), list.height) + usize::from(row - list.y);
    (index < session.results().len()).then_some(index)
}

pub struct SearchPaletteModal<'a> {
    pub theme: &'a Theme,
    pub session: &'a SearchSession,
    pub spinner: &'a str,
}

impl Widget for SearchPaletteModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = palette_layout(area);
        if layout.modal.width < 4 || layout.modal.height < 3 {
            return;
        }

        draw_drop_shadow(buf, layout.modal, area);
        Clear.render(layout.modal, buf);

        Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(" SEARCH ", self.theme.header_active),
                Span::raw(" "),
            ]))
            .title_bottom(Line::from(vec![
                Span::raw(" "),
                Span::styled("↑/↓", self.theme.footer_segment_key),
                Span::raw(": move "),
                Span::styled("Enter", self.theme.footer_segment_key),
                Span::raw(": open "),
                Span::styled("Esc", self.theme.footer_segment_key),
                Span::raw(": close "),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focus)
            .render(layout.modal, buf);

        // Query
        let query = if self.session.query().is_empty() {
            Span::styled(PLACEHOLDER, self.theme.placeholder)
        } else {
            Span::styled(self.session.query(), self.theme.footer_segment_val)
        };
        let input_line = Line::from(vec![
            Span::styled(" > ", self.theme.footer_segment_key),
            query,
            Span::styled(
                "_",
                self.theme
                    .footer_segment_val
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ]);
        buf.set_line(layout.input.x, layout.input.y, &input_line, layout.input.width);

        if layout.separator.height > 0 {
            let separator = "─".repeat(layout.separator.width as usize);
            buf.set_string(
                layout.separator.x,
                layout.separator.y,
                separator,
                self.theme.border_focus,
            );
        }

        if layout.heading.height > 0 {
            let mut heading = Vec::new();
            if self.session.is_loading() {
                heading.push(Span::styled(format!(" {} ", self.spinner), self.theme.spinner));
            } else {
                heading.push(Span::raw(" "));
            }
            heading.push(Span::styled(
                list_heading(self.session),
                self.theme.header_item,
            ));
            buf.set_line(
                layout.heading.x,
                layout.heading.y,
                &Line::from(heading),
                layout.heading.width,
            );
        }

        // Loading replaces the list.
        if self.session.is_loading() || layout.list.height == 0 {
            return;
        }

        let offset = list_offset(self.session.selected_index(), layout.list.height);
        let visible = self
            .session
            .results()
            .iter()
            .enumerate()
            .skip(offset)
            .take(layout.list.height as usize);

        for (row, (i, item)) in visible.enumerate() {
            let is_selected = i == self.session.selected_index();
            let style = if is_selected {
                self.theme.list_selected
            } else {
                self.theme.list_item
            };
            let prefix = if is_selected { "> " } else { "  " };
            let marker = if item.in_watchlist {
                format!(" {WATCHLIST_MARKER}")
            } else {
                String::new()
            };

            let line = Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(name_column(item.display_name()), style),
                Span::styled(format!(" {}", item.summary_line()), self.theme.exchange),
                Span::styled(marker, self.theme.watchlist),
            ]);
            let y = layout.list.y + row as u16;
            if is_selected {
                buf.set_style(
                    Rect::new(layout.list.x, y, layout.list.width, 1),
                    self.theme.list_selected,
                );
            }
            buf.set_line(layout.list.x, y, &line, layout.list.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SearchableItem;
    use ratatui::{backend::TestBackend, Terminal};

    fn seed() -> Vec<SearchableItem> {
        vec![
            SearchableItem::new("AAPL", "Apple Inc.", "NASDAQ", "Common Stock"),
            SearchableItem::new("GOOGL", "Alphabet Inc.", "NASDAQ", "Common Stock")
                .watchlisted(true),
        ]
    }

    fn render(session: &SearchSession) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| {
                f.render_widget(
                    SearchPaletteModal {
                        theme: &theme,
                        session,
                        spinner: "⠋",
                    },
                    f.area(),
                );
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_blank_query_shows_popular_stocks() {
        let mut session = SearchSession::new(seed());
        session.open();
        let screen = render(&session);
        assert!(screen.contains(PLACEHOLDER));
        assert!(screen.contains("Popular stocks (2)"));
        assert!(screen.contains("Apple Inc."));
        assert!(screen.contains("AAPL | NASDAQ | Common Stock"));
        assert!(screen.contains(WATCHLIST_MARKER));
    }

    #[test]
    fn test_empty_seed_heading() {
        let mut session = SearchSession::default();
        session.open();
        assert!(render(&session).contains("No stocks available"));
    }

    #[test]
    fn test_loading_hides_rows() {
        let mut session = SearchSession::new(seed());
        session.open();
        session.set_query("TSLA");
        let screen = render(&session);
        assert!(screen.contains("Loading stocks..."));
        assert!(screen.contains("TSLA"));
        assert!(!screen.contains("Apple Inc."));
    }

    #[test]
    fn test_results_and_no_results() {
        let mut session = SearchSession::new(seed());
        session.open();
        session.set_query("tesla");
        session.apply_lookup(
            session.generation(),
            Ok(vec![SearchableItem::new("TSLA", "", "NASDAQ", "Common Stock")]),
        );
        let screen = render(&session);
        assert!(screen.contains("Search results (1)"));
        // Empty name falls back to the symbol.
        assert!(screen.contains("> TSLA "));

        session.set_query("ZZZZ");
        session.apply_lookup(session.generation(), Ok(Vec::new()));
        assert!(render(&session).contains("No results found"));
    }

    #[test]
    fn test_row_at_maps_clicks_to_results() {
        let area = Rect::new(0, 0, 80, 24);
        let mut session = SearchSession::new(seed());
        session.open();
        let list = palette_layout(area).list;

        assert_eq!(row_at(area, &session, list.x + 1, list.y), Some(0));
        assert_eq!(row_at(area, &session, list.x + 1, list.y + 1), Some(1));
        assert_eq!(row_at(area, &session, list.x + 1, list.y + 2), None);
        assert_eq!(row_at(area, &session, 0, 0), None);
    }

    #[test]
    fn test_name_column_pads_and_truncates() {
        assert_eq!(name_column("Apple Inc.").len(), NAME_WIDTH);
        assert_eq!(
            name_column("International Business Machines"),
            "International Busi"
        );
    }

    #[test]
    fn test_list_offset_keeps_selection_visible() {
        assert_eq!(list_offset(0, 5), 0);
        assert_eq!(list_offset(4, 5), 0);
        assert_eq!(list_offset(7, 5), 3);
        assert_eq!(list_offset(3, 0), 3);
    }
}
