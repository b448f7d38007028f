use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharMark {
    Match,
    Mismatch,
    Extra,
}

/// Position-wise comparison of the typed text with the target. With no
/// target every character is a plain match.
pub fn mark_chars(typed: &str, target: &str) -> Vec<(char, CharMark)> {
    if target.is_empty() {
        return typed.chars().map(|c| (c, CharMark::Match)).collect();
    }
    let mut target_chars = target.chars();
    typed
        .chars()
        .map(|c| match target_chars.next() {
            Some(t) if t == c => (c, CharMark::Match),
            Some(_) => (c, CharMark::Mismatch),
            None => (c, CharMark::Extra),
        })
        .collect()
}

pub struct EntryPanel<'a> {
    typed: &'a str,
    target: &'a str,
    theme: &'a Theme,
}

impl<'a> EntryPanel<'a> {
    pub fn new(typed: &'a str, target: &'a str, theme: &'a Theme) -> Self {
        Self {
            typed,
            target,
            theme,
        }
    }
}

impl Widget for EntryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let target_line = if self.target.is_empty() {
            Line::from(Span::styled(
                "No target phrase  [Ctrl-N] pick one",
                Style::default().fg(colors.muted()),
            ))
        } else {
            Line::from(vec![
                Span::styled("Target: ", Style::default().fg(colors.muted())),
                Span::styled(self.target, Style::default().fg(colors.fg())),
            ])
        };

        let typed_line = if self.typed.is_empty() {
            Line::from(Span::styled(
                "Start typing...",
                Style::default().fg(colors.muted()),
            ))
        } else {
            let mut spans = vec![Span::styled("Typed:  ", Style::default().fg(colors.muted()))];
            for (ch, mark) in mark_chars(self.typed, self.target) {
                let style = match mark {
                    CharMark::Match => Style::default().fg(colors.success()),
                    CharMark::Mismatch => Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::UNDERLINED),
                    CharMark::Extra => Style::default().fg(colors.warning()),
                };
                spans.push(Span::styled(ch.to_string(), style));
            }
            spans.push(Span::styled("\u{258f}", Style::default().fg(colors.accent())));
            Line::from(spans)
        };

        let block = Block::bordered()
            .title(" Entry ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(vec![target_line, Line::from(""), typed_line])
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
