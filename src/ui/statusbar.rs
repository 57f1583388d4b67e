use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{ResolvedKeybinds, key_label};
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    status_message: Option<&str>,
    keybinds: &ResolvedKeybinds,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Status message takes priority
    if let Some(msg) = status_message {
        let color = if msg.starts_with("Poll failed") {
            theme.status_err
        } else {
            theme.status_ok
        };
        let line = Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let mut spans = Vec::new();
    spans.extend(pill_spans(key_label(keybinds.quit), "Quit", theme));
    spans.extend(pill_spans(
        format!("{}{}", key_label(keybinds.zoom_in), key_label(keybinds.zoom_out)),
        "Zoom",
        theme,
    ));
    spans.extend(pill_spans(key_label(keybinds.reset_view), "Reset", theme));
    spans.extend(pill_spans(key_label(keybinds.refresh), "Refresh", theme));
    spans.extend(pill_spans(key_label(keybinds.toggle_usage), "Usage", theme));
    spans.extend(pill_spans(key_label(keybinds.help), "Help", theme));
    spans.extend(pill_spans(
        "\u{2190}\u{2193}\u{2191}\u{2192}".to_string(),
        "Pan",
        theme,
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn pill_spans<'a>(key: String, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
