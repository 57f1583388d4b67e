use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Moves `distance` along the unit vector at `angle` (radians).
    pub fn offset(self, angle: f64, distance: f64) -> Self {
        Self {
            x: self.x + distance * angle.cos(),
            y: self.y + distance * angle.sin(),
        }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Placement of a single process for one poll cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub pid: u32,
    pub parent: Option<u32>,
    pub depth: usize,
    /// Branch angle in radians. Not normalized.
    pub angle: f64,
    /// Where the node itself is drawn.
    pub position: Point,
    /// Just past the node's label; children radiate from here.
    pub anchor: Point,
    /// Edge curve control point, present for non-roots.
    pub control: Option<Point>,
}
