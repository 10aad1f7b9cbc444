use crate::app::state::AppState;
use crate::components::search_trigger::SearchTrigger;
use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct Welcome<'a> {
    pub app_state: &'a AppState,
    pub theme: &'a Theme,
}

impl Widget for Welcome<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let logo_ascii = [
            r" _____ ___ ___ _  _____ ",
            r"|_   _|_ _/ __| |/ / _ \",
            r"  | |  | | (__| ' <|   /",
            r"  |_| |___\___|_|\_\_|_\",
        ];

        let mut lines: Vec<Line> = logo_ascii
            .iter()
            .map(|l| Line::from(Span::styled(*l, self.theme.header_logo)))
            .collect();

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" TICKR ", self.theme.header_logo),
            Span::raw(" - Stocks at your fingertips"),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled("Ctrl+K", self.theme.footer_segment_key),
            Span::raw(" or click "),
            Span::styled(
                SearchTrigger::text(&self.app_state.trigger),
                self.theme.trigger_button,
            ),
            Span::raw(" to search"),
        ]));
        lines.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled("q", self.theme.footer_segment_key),
            Span::raw(" to quit"),
        ]));

        if !self.app_state.recent.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Recently viewed", self.theme.header_item)));
            let recent: Vec<Span> = self
                .app_state
                .recent
                .iter()
                .flat_map(|symbol| {
                    [
                        Span::styled(symbol.to_string(), self.theme.symbol),
                        Span::raw("  "),
                    ]
                })
                .collect();
            lines.push(Line::from(recent));
        }

        let height = lines.len() as u16;
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);

        let centered_area = Rect {
            x: area.x,
            y: (area.y + area.height / 2).saturating_sub(height / 2),
            width: area.width,
            height: height.min(area.height),
        };

        if centered_area.width > 0 && centered_area.height > 0 {
            paragraph.render(centered_area, buf);
        }
    }
}
