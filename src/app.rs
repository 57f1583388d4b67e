use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::radial::color::HeatGradient;
use crate::radial::geometry::Scene;
use crate::radial::layout::CellMeasure;
use crate::radial::{SceneOptions, build_scene};
use crate::system::source::DataSource;
use crate::system::summary::SystemSummary;
use crate::ui::theme::{Theme, resolve_color_support};
use crate::view::View;

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub zoom_in: KeyCode,
    pub zoom_out: KeyCode,
    pub reset_view: KeyCode,
    pub refresh: KeyCode,
    pub toggle_usage: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            zoom_in: parse_key(&kb.zoom_in).unwrap_or(KeyCode::Char('+')),
            zoom_out: parse_key(&kb.zoom_out).unwrap_or(KeyCode::Char('-')),
            reset_view: parse_key(&kb.reset_view).unwrap_or(KeyCode::Char('0')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            toggle_usage: parse_key(&kb.toggle_usage).unwrap_or(KeyCode::Char('s')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.zoom_in), "Zoom in"),
            (key_label(self.zoom_out), "Zoom out"),
            (key_label(self.reset_view), "Reset view"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.toggle_usage), "Toggle usage panel"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("↑↓←→".to_string(), "Pan"));
        entries.push(("Drag".to_string(), "Pan"));
        entries.push(("Wheel".to_string(), "Zoom at pointer"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    source: Box<dyn DataSource>,
    /// Last successfully built scene; replaced whole on each good poll.
    pub scene: Scene,
    pub summary: SystemSummary,
    pub process_count: usize,
    pub view: View,
    pub canvas_area: Option<Rect>,
    pub input_mode: InputMode,
    pub show_usage_panel: bool,
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
    pub keybinds: ResolvedKeybinds,
    pub refresh_rate_ms: u64,
    options: SceneOptions,
    measure: CellMeasure,
    zoom_step: f64,
    pan_step: u16,
}

impl App {
    pub fn new(config: Config, source: Box<dyn DataSource>) -> Self {
        let color_support = resolve_color_support(&config.general.color_support);
        let theme = Theme::from_config(&config.colors.theme, color_support);

        let mut app = App {
            running: true,
            source,
            scene: Scene::default(),
            summary: SystemSummary::default(),
            process_count: 0,
            view: View::default(),
            canvas_area: None,
            input_mode: InputMode::Normal,
            show_usage_panel: config.general.show_usage_panel,
            theme,
            status_message: None,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            refresh_rate_ms: config.general.refresh_rate_ms,
            options: config.scene_options(),
            measure: config.radial.measure(),
            zoom_step: config.radial.zoom_step,
            pan_step: config.radial.pan_step,
        };
        app.refresh_data();
        app
    }

    /// Runs one poll cycle. On failure the previous scene stays on screen.
    pub fn refresh_data(&mut self) {
        let started = Instant::now();
        match self.source.poll() {
            Ok(data) => {
                let data = data.visible(&self.options);
                let scene = build_scene(&data.processes, &self.options, &self.measure);
                tracing::debug!(
                    processes = data.processes.len(),
                    nodes = scene.nodes.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "poll cycle complete"
                );
                self.process_count = data.processes.len();
                self.scene = scene;
                self.summary = data.summary;
            }
            Err(err) => {
                tracing::warn!(error = %err, "poll failed, keeping previous scene");
                self.set_status(format!("Poll failed: {err}"));
            }
        }

        if let Some((_, created)) = &self.status_message
            && created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// The status message, while it is still fresh.
    pub fn status_text(&self) -> Option<&str> {
        self.status_message
            .as_ref()
            .filter(|(_, created)| created.elapsed() < STATUS_TTL)
            .map(|(msg, _)| msg.as_str())
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Arrow keys are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Pan(Direction::Up),
            KeyCode::Down => return Action::Pan(Direction::Down),
            KeyCode::Left => return Action::Pan(Direction::Left),
            KeyCode::Right => return Action::Pan(Direction::Right),
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        // '=' shares the '+' key on most layouts.
        if code == kb.zoom_in || (kb.zoom_in == KeyCode::Char('+') && code == KeyCode::Char('=')) {
            return Action::ZoomIn;
        }
        if code == kb.zoom_out {
            return Action::ZoomOut;
        }
        if code == kb.reset_view {
            return Action::ResetView;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == kb.toggle_usage {
            return Action::ToggleUsagePanel;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    /// Wheel zoom is applied here directly since it needs the pointer cell.
    pub fn map_mouse(&mut self, mouse: MouseEvent) -> Action {
        if self.input_mode == InputMode::Help {
            return Action::None;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.in_canvas(mouse.column, mouse.row) => {
                Action::DragStart(mouse.column, mouse.row)
            }
            MouseEventKind::Drag(MouseButton::Left) if self.view.is_dragging() => {
                Action::DragTo(mouse.column, mouse.row)
            }
            MouseEventKind::Up(MouseButton::Left) if self.view.is_dragging() => Action::DragEnd,
            MouseEventKind::ScrollUp => {
                self.zoom_at(self.zoom_step, mouse.column, mouse.row);
                Action::None
            }
            MouseEventKind::ScrollDown => {
                self.zoom_at(1.0 / self.zoom_step, mouse.column, mouse.row);
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Pan(direction) => {
                let step = i32::from(self.pan_step);
                let (dx, dy) = match direction {
                    Direction::Up => (0, -step),
                    Direction::Down => (0, step),
                    Direction::Left => (-step, 0),
                    Direction::Right => (step, 0),
                };
                let (cols, rows) = self.canvas_size();
                self.view.pan_cells(dx, dy, self.scene.bounds, cols, rows);
            }
            Action::ZoomIn => self.view.zoom_by(self.zoom_step),
            Action::ZoomOut => self.view.zoom_by(1.0 / self.zoom_step),
            Action::ResetView => self.view.reset(),
            Action::DragStart(col, row) => self.view.begin_drag(col, row),
            Action::DragTo(col, row) => {
                let (cols, rows) = self.canvas_size();
                self.view.drag_to(col, row, self.scene.bounds, cols, rows);
            }
            Action::DragEnd => self.view.end_drag(),
            Action::Refresh => self.refresh_data(),
            Action::ToggleUsagePanel => {
                self.show_usage_panel = !self.show_usage_panel;
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::None => {}
        }
    }

    fn zoom_at(&mut self, factor: f64, col: u16, row: u16) {
        let Some(area) = self.canvas_area.filter(|_| self.in_canvas(col, row)) else {
            self.view.zoom_by(factor);
            return;
        };
        let cell = (
            f64::from(col - area.x) + 0.5,
            f64::from(row - area.y) + 0.5,
        );
        self.view
            .zoom_at(factor, cell, self.scene.bounds, area.width, area.height);
    }

    fn in_canvas(&self, col: u16, row: u16) -> bool {
        self.canvas_area.is_some_and(|area| {
            col >= area.x
                && col < area.x + area.width
                && row >= area.y
                && row < area.y + area.height
        })
    }

    fn canvas_size(&self) -> (u16, u16) {
        self.canvas_area
            .map(|area| (area.width, area.height))
            .unwrap_or((80, 24))
    }

    pub fn gradient(&self) -> &HeatGradient {
        &self.options.gradient
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radial::tree::ProcessRecord;
    use color_eyre::eyre::{Result, eyre};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Serves a fixed sample until told to fail.
    struct ScriptedSource {
        processes: Vec<ProcessRecord>,
        fail: Rc<Cell<bool>>,
    }

    impl DataSource for ScriptedSource {
        fn fetch_processes(&mut self) -> Result<Vec<ProcessRecord>> {
            if self.fail.get() {
                return Err(eyre!("endpoint unreachable"));
            }
            Ok(self.processes.clone())
        }

        fn fetch_summary(&mut self) -> Result<SystemSummary> {
            Ok(SystemSummary {
                cpu_usage: 12.5,
                ..SystemSummary::default()
            })
        }
    }

    fn record(pid: u32, ppid: u32, name: &str, cpu: f64) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid,
            name: name.to_string(),
            cpu_percent: cpu,
            memory_percent: 1.0,
        }
    }

    fn make_test_app() -> (App, Rc<Cell<bool>>) {
        let fail = Rc::new(Cell::new(false));
        let source = ScriptedSource {
            processes: vec![
                record(1, 0, "init", 1.0),
                record(2, 1, "sshd", 50.0),
                record(3, 1, "cron", 0.0),
                record(4, 2, "bash", 100.0),
            ],
            fail: Rc::clone(&fail),
        };
        let app = App::new(Config::default(), Box::new(source));
        (app, fail)
    }

    #[test]
    fn initial_poll_builds_scene() {
        let (app, _) = make_test_app();
        assert_eq!(app.scene.nodes.len(), 4);
        assert_eq!(app.scene.edges.len(), 3);
        assert_eq!(app.process_count, 4);
        assert_eq!(app.summary.cpu_usage, 12.5);
        assert_eq!(app.summary.top_cpu[0].name, "bash");
    }

    #[test]
    fn idle_placeholder_is_left_out_of_counts_and_tops() {
        let source = ScriptedSource {
            processes: vec![
                record(0, 0, "System Idle Process", 95.0),
                record(4, 0, "System", 2.0),
                record(100, 4, "smss.exe", 1.0),
            ],
            fail: Rc::new(Cell::new(false)),
        };
        let app = App::new(Config::default(), Box::new(source));

        assert_eq!(app.process_count, 2);
        assert_eq!(app.scene.nodes.len(), 2);
        assert_eq!(app.summary.top_cpu[0].name, "System");
        assert!(
            app.summary
                .top_cpu
                .iter()
                .all(|top| top.name != "System Idle Process")
        );
    }

    #[test]
    fn failed_poll_keeps_previous_scene() {
        let (mut app, fail) = make_test_app();
        let before = app.scene.clone();

        fail.set(true);
        app.dispatch(Action::Refresh);

        assert_eq!(app.scene, before);
        assert_eq!(app.summary.cpu_usage, 12.5);
        let status = app.status_text().unwrap();
        assert!(status.starts_with("Poll failed"));
        assert!(status.contains("endpoint unreachable"));

        fail.set(false);
        app.refresh_data();
        assert_eq!(app.scene.nodes.len(), 4);
    }

    #[test]
    fn view_changes_do_not_touch_scene() {
        let (mut app, _) = make_test_app();
        app.canvas_area = Some(Rect::new(0, 1, 80, 22));
        let before = app.scene.clone();

        app.dispatch(Action::ZoomIn);
        app.dispatch(Action::Pan(Direction::Left));
        app.dispatch(Action::DragStart(10, 10));
        app.dispatch(Action::DragTo(20, 12));
        app.dispatch(Action::DragEnd);

        assert_eq!(app.scene, before);
        assert!((app.view.scale - 1.1).abs() < 1e-9);
        assert_ne!(app.view.pan.x, 0.0);

        app.dispatch(Action::ResetView);
        assert_eq!(app.view, View::default());
    }

    #[test]
    fn zoom_out_divides_scale() {
        let (mut app, _) = make_test_app();
        app.dispatch(Action::ZoomOut);
        assert!((app.view.scale - 1.0 / 1.1).abs() < 1e-9);
    }

    #[test]
    fn wheel_zooms_and_drag_requires_canvas() {
        let (mut app, _) = make_test_app();
        app.canvas_area = Some(Rect::new(0, 1, 80, 22));

        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 40,
            row: 10,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(app.map_mouse(wheel), Action::None);
        assert!((app.view.scale - 1.1).abs() < 1e-9);

        let outside = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 40,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(app.map_mouse(outside), Action::None);

        let inside = MouseEvent { row: 5, ..outside };
        assert_eq!(app.map_mouse(inside), Action::DragStart(40, 5));
    }

    #[test]
    fn default_keybinds() {
        let (app, _) = make_test_app();

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ZoomIn);

        let key = KeyEvent::new(KeyCode::Char('='), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ZoomIn);

        let key = KeyEvent::new(KeyCode::Char('-'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ZoomOut);

        let key = KeyEvent::new(KeyCode::Char('0'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ResetView);

        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleUsagePanel);

        // Ctrl+C always quits
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);

        // Arrow keys stay hardwired
        let key = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Pan(Direction::Up));
    }

    #[test]
    fn custom_keybind_remap_works() {
        let (mut app, _) = make_test_app();

        app.keybinds.quit = KeyCode::Char('x');

        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);
    }

    #[test]
    fn help_mode_blocks_other_keys() {
        let (mut app, _) = make_test_app();

        app.dispatch(Action::ToggleHelp);
        assert_eq!(app.input_mode, InputMode::Help);
        assert!(app.show_help());

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHelp);

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);

        app.dispatch(Action::ToggleHelp);
        assert!(!app.show_help());
    }

    #[test]
    fn toggles_usage_panel() {
        let (mut app, _) = make_test_app();
        assert!(app.show_usage_panel);
        app.dispatch(Action::ToggleUsagePanel);
        assert!(!app.show_usage_panel);
    }
}
