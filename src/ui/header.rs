use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::ui::theme::Theme;

pub struct HeaderInfo {
    pub process_count: usize,
    pub node_count: usize,
    pub scale: f64,
    pub refresh_rate_ms: u64,
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let secondary = Style::default().fg(theme.text_secondary);
    let line = Line::from(vec![
        Span::styled(
            " radialtop ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("Procs: {}", info.process_count), secondary),
        Span::raw("  "),
        Span::styled(format!("Shown: {}", info.node_count), secondary),
        Span::raw("  "),
        Span::styled(format!("Zoom: {:.2}x", info.scale), secondary),
        Span::raw("  "),
        Span::styled(
            format!("Poll: {:.1}s", info.refresh_rate_ms as f64 / 1000.0),
            secondary,
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
