use crate::radial::geometry::Bounds;
use crate::radial::node::Point;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;
/// Fraction of the scene size kept free around the fitted scene.
const FIT_MARGIN: f64 = 0.05;
const MIN_SCALE: f64 = 0.01;
const MAX_SCALE: f64 = 100.0;

/// Visible region in scene coordinates (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Viewport {
    pub fn width(&self) -> f64 {
        self.x[1] - self.x[0]
    }

    pub fn height(&self) -> f64 {
        self.y[1] - self.y[0]
    }
}

/// Pan and zoom applied on top of the fitted scene. Never touches the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    /// Scene-unit offset of the view center from the scene center.
    pub pan: Point,
    pub scale: f64,
    drag_from: Option<(u16, u16)>,
}

impl Default for View {
    fn default() -> Self {
        View {
            pan: Point::default(),
            scale: 1.0,
            drag_from: None,
        }
    }
}

impl View {
    pub fn reset(&mut self) {
        *self = View::default();
    }

    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// Zooms while keeping the scene point under `cell` fixed on screen.
    pub fn zoom_at(
        &mut self,
        factor: f64,
        cell: (f64, f64),
        bounds: Option<Bounds>,
        cols: u16,
        rows: u16,
    ) {
        let before = self.viewport(bounds, cols, rows);
        let (ux, uy) = units_per_cell(&before, cols, rows);
        let target = Point::new(before.x[0] + cell.0 * ux, before.y[0] + cell.1 * uy);

        self.zoom_by(factor);

        let after = self.viewport(bounds, cols, rows);
        let (ux, uy) = units_per_cell(&after, cols, rows);
        let landed = Point::new(after.x[0] + cell.0 * ux, after.y[0] + cell.1 * uy);
        self.pan.x += target.x - landed.x;
        self.pan.y += target.y - landed.y;
    }

    /// Moves the view by whole cells; positive `dx` looks further right.
    pub fn pan_cells(&mut self, dx: i32, dy: i32, bounds: Option<Bounds>, cols: u16, rows: u16) {
        let viewport = self.viewport(bounds, cols, rows);
        let (ux, uy) = units_per_cell(&viewport, cols, rows);
        self.pan.x += dx as f64 * ux;
        self.pan.y += dy as f64 * uy;
    }

    pub fn begin_drag(&mut self, col: u16, row: u16) {
        self.drag_from = Some((col, row));
    }

    /// Drags the scene along with the pointer.
    pub fn drag_to(&mut self, col: u16, row: u16, bounds: Option<Bounds>, cols: u16, rows: u16) {
        let Some((from_col, from_row)) = self.drag_from else {
            return;
        };
        let dx = from_col as i32 - col as i32;
        let dy = from_row as i32 - row as i32;
        self.pan_cells(dx, dy, bounds, cols, rows);
        self.drag_from = Some((col, row));
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Fits `bounds` into a `cols` x `rows` area, then applies pan and zoom.
    pub fn viewport(&self, bounds: Option<Bounds>, cols: u16, rows: u16) -> Viewport {
        let (center, width, height) = match bounds {
            Some(b) => (b.center(), b.width().max(1.0), b.height().max(1.0)),
            None => (Point::default(), 1000.0, 1000.0),
        };
        let width = width * (1.0 + 2.0 * FIT_MARGIN);
        let height = height * (1.0 + 2.0 * FIT_MARGIN);

        let cols = f64::from(cols.max(1));
        let rows = f64::from(rows.max(1));
        let fitted = (width / cols).max(height / (rows * CELL_ASPECT));
        let ux = fitted / self.scale;
        let uy = ux * CELL_ASPECT;

        let cx = center.x + self.pan.x;
        let cy = center.y + self.pan.y;
        let half_w = cols * ux / 2.0;
        let half_h = rows * uy / 2.0;
        Viewport {
            x: [cx - half_w, cx + half_w],
            y: [cy - half_h, cy + half_h],
        }
    }
}

fn units_per_cell(viewport: &Viewport, cols: u16, rows: u16) -> (f64, f64) {
    (
        viewport.width() / f64::from(cols.max(1)),
        viewport.height() / f64::from(rows.max(1)),
    )
}
