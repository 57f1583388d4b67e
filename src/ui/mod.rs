pub mod header;
pub mod help;
pub mod radial_canvas;
pub mod statusbar;
pub mod theme;
pub mod usage_panel;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

const USAGE_PANEL_WIDTH: u16 = 38;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let content_area = chunks[1];
    let canvas_area = if app.show_usage_panel {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(USAGE_PANEL_WIDTH)])
            .split(content_area);
        usage_panel::render(frame, h_chunks[1], &app.summary, app.gradient(), &app.theme);
        h_chunks[0]
    } else {
        content_area
    };

    let inner = radial_canvas::render(frame, canvas_area, &app.scene, &app.view, &app.theme);
    app.canvas_area = Some(inner);

    header::render(
        frame,
        chunks[0],
        &header::HeaderInfo {
            process_count: app.process_count,
            node_count: app.scene.nodes.len(),
            scale: app.view.scale,
            refresh_rate_ms: app.refresh_rate_ms,
        },
        &app.theme,
    );
    statusbar::render(
        frame,
        chunks[2],
        app.status_text(),
        &app.keybinds,
        &app.theme,
    );

    // Help overlay, rendered last to appear on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}
