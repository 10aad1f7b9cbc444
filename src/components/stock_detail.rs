use crate::app::state::AppState;
use crate::domain::models::{SearchableItem, Symbol};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

/// Detail panel for `/stocks/<symbol>`. Shows whatever the app already knows
/// about the symbol; quotes and charts are out of scope.
pub struct StockDetail<'a> {
    pub symbol: &'a Symbol,
    pub app_state: &'a AppState,
    pub theme: &'a Theme,
}

/// Looks the symbol up among the seed and the latest results.
pub fn find_known<'a>(app_state: &'a AppState, symbol: &Symbol) -> Option<&'a SearchableItem> {
    app_state
        .search
        .seed()
        .iter()
        .chain(app_state.search.results())
        .find(|item| item.symbol == *symbol)
}

impl Widget for StockDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(self.symbol.to_string(), self.theme.header_active),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focus);

        let mut lines = Vec::new();
        match find_known(self.app_state, self.symbol) {
            Some(item) => {
                lines.push(Line::from(Span::styled(
                    item.display_name().to_string(),
                    self.theme.symbol,
                )));
                lines.push(Line::from(Span::styled(
                    item.summary_line(),
                    self.theme.exchange,
                )));
                if item.in_watchlist {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "★ In your watchlist",
                        self.theme.watchlist,
                    )));
                }
            }
            None => lines.push(Line::from(Span::styled(
                self.symbol.to_string(),
                self.theme.symbol,
            ))),
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("h", self.theme.footer_segment_key),
            Span::raw(" back home  "),
            Span::styled("Ctrl+K", self.theme.footer_segment_key),
            Span::raw(" search again"),
        ]));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
