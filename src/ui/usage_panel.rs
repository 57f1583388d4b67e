use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Wrap};

use crate::format::{format_gb_pair, format_network, format_percent, truncate_unicode};
use crate::radial::color::HeatGradient;
use crate::system::summary::{SystemSummary, TopProcess};
use crate::ui::theme::Theme;

const NAME_CELLS: usize = 20;

/// CPU and memory gauges, top-5 lists and network counters.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    summary: &SystemSummary,
    gradient: &HeatGradient,
    theme: &Theme,
) {
    let top_rows = |list: &[TopProcess]| list.len().max(1) as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(top_rows(&summary.top_cpu)),
            Constraint::Length(top_rows(&summary.top_memory)),
            Constraint::Min(3),
        ])
        .split(area);

    render_gauge(
        frame,
        chunks[0],
        " CPU ",
        summary.cpu_usage,
        format_percent(summary.cpu_usage),
        theme,
    );
    render_gauge(
        frame,
        chunks[1],
        " MEM ",
        summary.memory.percent,
        format!(
            "{} ({})",
            format_gb_pair(summary.memory.used, summary.memory.total),
            format_percent(summary.memory.percent)
        ),
        theme,
    );
    render_top_list(frame, chunks[2], " Top CPU ", &summary.top_cpu, gradient, theme);
    render_top_list(frame, chunks[3], " Top Memory ", &summary.top_memory, gradient, theme);

    let network = &summary.network;
    let block = panel_block(" Network ", theme);
    let text = format_network(
        network.bytes_sent,
        network.bytes_recv,
        network.packets_sent,
        network.packets_recv,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(theme.text_primary)))
            .block(block)
            .wrap(Wrap { trim: true }),
        chunks[4],
    );
}

fn panel_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_gauge(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    percent: f64,
    label: String,
    theme: &Theme,
) {
    let gauge = Gauge::default()
        .block(panel_block(title, theme))
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_top_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[TopProcess],
    gradient: &HeatGradient,
    theme: &Theme,
) {
    let lines: Vec<Line> = if entries.is_empty() {
        vec![Line::from(Span::styled(
            " no data",
            Style::default().fg(theme.text_secondary),
        ))]
    } else {
        entries
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        " \u{25cf} ",
                        Style::default().fg(theme.heat(gradient.color_for(entry.percent))),
                    ),
                    Span::styled(
                        format!(
                            "{:<width$}",
                            truncate_unicode(&entry.name, NAME_CELLS),
                            width = NAME_CELLS
                        ),
                        Style::default().fg(theme.text_primary),
                    ),
                    Span::styled(
                        format!(" {:>6}", format_percent(entry.percent)),
                        Style::default().fg(theme.text_secondary),
                    ),
                ])
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(panel_block(title, theme)), area);
}
