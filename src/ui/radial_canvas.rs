use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Block, BorderType, Borders};
use unicode_width::UnicodeWidthStr;

use crate::format::truncate_unicode;
use crate::radial::geometry::{Scene, TextAlign};
use crate::radial::node::Point;
use crate::ui::theme::Theme;
use crate::view::View;

/// Straight segments per Bézier edge.
const EDGE_SEGMENTS: usize = 12;
const MAX_LABEL_CELLS: usize = 24;

/// Canvas y grows upward, scene y grows downward.
fn flip(p: Point) -> (f64, f64) {
    (p.x, -p.y)
}

/// Paints the cached scene through the current view. Returns the inner
/// canvas area so mouse input can be mapped back onto it.
pub fn render(frame: &mut Frame, area: Rect, scene: &Scene, view: &View, theme: &Theme) -> Rect {
    let _span =
        tracing::trace_span!("ui.radial_canvas.render", nodes = scene.nodes.len()).entered();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Process tree ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);

    let viewport = view.viewport(scene.bounds, inner.width, inner.height);
    let cell_width = viewport.width() / f64::from(inner.width.max(1));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(viewport.x)
        .y_bounds([-viewport.y[1], -viewport.y[0]])
        .paint(|ctx| {
            for edge in &scene.edges {
                let color = theme.heat(edge.color);
                let mut prev = flip(edge.from);
                for step in 1..=EDGE_SEGMENTS {
                    let next = flip(edge.point_at(step as f64 / EDGE_SEGMENTS as f64));
                    ctx.draw(&CanvasLine {
                        x1: prev.0,
                        y1: prev.1,
                        x2: next.0,
                        y2: next.1,
                        color,
                    });
                    prev = next;
                }
            }

            ctx.layer();
            for node in &scene.nodes {
                ctx.draw(&Points {
                    coords: &[flip(node.position)],
                    color: theme.heat(node.color),
                });
            }

            ctx.layer();
            if scene.is_empty() {
                ctx.print(
                    viewport.x[0] + cell_width,
                    -viewport.y[0] - viewport.height() / 2.0,
                    Span::styled(
                        "Waiting for process data...",
                        Style::default()
                            .fg(theme.text_secondary)
                            .add_modifier(Modifier::ITALIC),
                    ),
                );
            }
            for node in &scene.nodes {
                let text = truncate_unicode(&node.name, MAX_LABEL_CELLS);
                let (x, y) = flip(node.label.position);
                // One cell of clearance between the dot and the text.
                let x = match node.label.align {
                    TextAlign::Left => x + cell_width,
                    TextAlign::Right => x - (text.width() as f64 + 1.0) * cell_width,
                };
                ctx.print(
                    x,
                    y,
                    Span::styled(text, Style::default().fg(theme.text_primary)),
                );
            }
        });

    frame.render_widget(canvas, area);
    inner
}
