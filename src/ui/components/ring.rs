use std::f64::consts::PI;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

const CENTER_RADIUS: f64 = 0.22;
const PREDICTION_RADIUS: f64 = 0.52;
const OUTER_RADIUS: f64 = 0.85;

/// Label position for slot `index` of `count` equal slices, starting at the
/// top and running clockwise. Canvas y grows upwards.
pub fn slot_position(index: usize, count: usize, radius: f64) -> (f64, f64) {
    let count = count.max(1) as f64;
    let start = index as f64 / count * 2.0 * PI - PI / 2.0;
    let mid = start + PI / count;
    (radius * mid.cos(), -radius * mid.sin())
}

pub fn display_char(ch: char) -> String {
    if ch == ' ' {
        "\u{2423}".to_string() // ␣
    } else {
        ch.to_string()
    }
}

pub struct RingView<'a> {
    center: Option<char>,
    predictions: &'a [char],
    outer: &'a [char],
    full_ring: bool,
    uppercase: bool,
    theme: &'a Theme,
}

impl<'a> RingView<'a> {
    pub fn new(
        center: Option<char>,
        predictions: &'a [char],
        outer: &'a [char],
        full_ring: bool,
        uppercase: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            center,
            predictions,
            outer,
            full_ring,
            uppercase,
            theme,
        }
    }

    fn label(&self, ch: char) -> String {
        if self.uppercase {
            display_char(ch.to_ascii_uppercase())
        } else {
            display_char(ch)
        }
    }
}

impl Widget for RingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let outer_labels: Vec<String> = self.outer.iter().map(|&c| self.label(c)).collect();
        let prediction_labels: Vec<String> = self
            .predictions
            .iter()
            .enumerate()
            .map(|(i, &c)| format!("{}:{}", i + 1, self.label(c)))
            .collect();
        let center_label = self.center.map_or("\u{00b7}".to_string(), |c| self.label(c));

        let ring_color = colors.border();
        let outer_style = Style::default().fg(colors.outer());
        let prediction_style = Style::default()
            .fg(colors.predicted())
            .add_modifier(Modifier::BOLD);
        let center_style = Style::default()
            .fg(colors.center())
            .add_modifier(Modifier::BOLD);
        let full_ring = self.full_ring;

        let canvas = Canvas::default()
            .block(
                Block::bordered()
                    .title(" Ring ")
                    .border_style(Style::default().fg(colors.border()))
                    .style(Style::default().bg(colors.bg())),
            )
            .background_color(colors.bg())
            .x_bounds([-1.0, 1.0])
            .y_bounds([-1.0, 1.0])
            .paint(move |ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: 0.98,
                    color: ring_color,
                });

                if full_ring {
                    for (i, label) in outer_labels.iter().enumerate() {
                        let (x, y) = slot_position(i, outer_labels.len(), OUTER_RADIUS);
                        ctx.print(x, y, Span::styled(label.clone(), outer_style));
                    }
                    return;
                }

                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: CENTER_RADIUS,
                    color: ring_color,
                });
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: (PREDICTION_RADIUS + OUTER_RADIUS) / 2.0,
                    color: ring_color,
                });
                ctx.print(0.0, 0.0, Span::styled(center_label.clone(), center_style));

                for (i, label) in prediction_labels.iter().enumerate() {
                    let (x, y) = slot_position(i, prediction_labels.len(), PREDICTION_RADIUS);
                    ctx.print(x, y, Span::styled(label.clone(), prediction_style));
                }
                for (i, label) in outer_labels.iter().enumerate() {
                    let (x, y) = slot_position(i, outer_labels.len(), OUTER_RADIUS);
                    ctx.print(x, y, Span::styled(label.clone(), outer_style));
                }
            });

        canvas.render(area, buf);
    }
}
