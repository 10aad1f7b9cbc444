use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Row, Table, Widget},
};

use super::helpers::{centered_rect, draw_drop_shadow};

pub struct HelpModal<'a> {
    pub theme: &'a Theme,
}

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Search",
        &[
            (" Ctrl+K / Cmd+K", "Toggle the search palette"),
            (" / or s", "Open the search palette"),
            (" Enter", "Open the highlighted stock"),
            (" \u{2191} / \u{2193}", "Move the highlight"),
            (" Ctrl+U", "Clear the query"),
            (" Esc", "Close the palette"),
        ],
    ),
    (
        "General",
        &[
            (" h / Esc", "Back to home"),
            (" ?", "Toggle this help"),
            (" q", "Quit"),
        ],
    ),
];

impl Widget for HelpModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let help_area = centered_rect(70, 70, area);
        if help_area.width == 0 || help_area.height == 0 {
            return;
        }
        draw_drop_shadow(buf, help_area, area);
        Clear.render(help_area, buf);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(" HELP - KEYBINDINGS ", self.theme.header_active),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focus);

        let key_style = self.theme.footer_segment_key;
        let desc_style = self.theme.list_item;
        let category_style = self.theme.header_item;

        let mut rows = Vec::new();
        for (i, (category, bindings)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                rows.push(Row::new(vec![Cell::from(""), Cell::from("")]));
            }
            rows.push(Row::new(vec![
                Cell::from(Span::styled(*category, category_style)),
                Cell::from(""),
            ]));
            for (key, desc) in *bindings {
                rows.push(Row::new(vec![
                    Cell::from(Span::styled(*key, key_style)),
                    Cell::from(Span::styled(*desc, desc_style)),
                ]));
            }
        }

        let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(0)]).block(block);
        Widget::render(table, help_area, buf);
    }
}
