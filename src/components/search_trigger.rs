use crate::config::{TriggerConfig, TriggerVariant};
use crate::theme::Theme;
use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::Widget};

/// The header affordance that opens the search palette.
pub struct SearchTrigger<'a> {
    pub config: &'a TriggerConfig,
    pub theme: &'a Theme,
}

impl SearchTrigger<'_> {
    pub fn text(config: &TriggerConfig) -> String {
        match config.variant {
            TriggerVariant::Button => format!("[ + {} ]", config.label),
            TriggerVariant::Text => format!(" {} ", config.label),
        }
    }

    pub fn width(config: &TriggerConfig) -> u16 {
        u16::try_from(Self::text(config).chars().count()).unwrap_or(u16::MAX)
    }
}

impl Widget for SearchTrigger<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = match self.config.variant {
            TriggerVariant::Button => self.theme.trigger_button,
            TriggerVariant::Text => self.theme.trigger_text,
        };
        let span = Span::styled(Self::text(self.config), style);
        buf.set_span(area.x, area.y, &span, area.width);
    }
}
