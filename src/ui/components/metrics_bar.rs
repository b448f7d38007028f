use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::{StatusKind, StatusMessage};
use crate::ui::theme::Theme;

pub fn format_wpm(wpm: Option<f64>) -> String {
    wpm.map_or("--".to_string(), |w| format!("{w:.1}"))
}

pub fn format_msd(msd: Option<usize>) -> String {
    msd.map_or("--".to_string(), |d| d.to_string())
}

pub struct MetricsBar<'a> {
    wpm: Option<f64>,
    msd: Option<usize>,
    status: Option<&'a StatusMessage>,
    theme: &'a Theme,
}

impl<'a> MetricsBar<'a> {
    pub fn new(
        wpm: Option<f64>,
        msd: Option<usize>,
        status: Option<&'a StatusMessage>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            wpm,
            msd,
            status,
            theme,
        }
    }
}

impl Widget for MetricsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.muted());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        let metrics = Line::from(vec![
            Span::styled("WPM ", label),
            Span::styled(format_wpm(self.wpm), value),
            Span::styled("   MSD ", label),
            Span::styled(format_msd(self.msd), value),
        ]);

        let status = match self.status {
            Some(msg) => {
                let color = match msg.kind {
                    StatusKind::Info => colors.fg(),
                    StatusKind::Success => colors.success(),
                    StatusKind::Error => colors.error(),
                };
                Line::from(Span::styled(msg.text.as_str(), Style::default().fg(color)))
            }
            None => Line::from(""),
        };

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(vec![metrics, status])
            .block(block)
            .render(area, buf);
    }
}
