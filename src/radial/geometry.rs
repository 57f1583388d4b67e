use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI};

use serde::Serialize;

use super::color::{HeatGradient, Rgb};
use super::node::{LayoutNode, Point};
use super::tree::ProcessForest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelGeometry {
    pub position: Point,
    pub rotation: f64,
    pub align: TextAlign,
}

impl LabelGeometry {
    /// Labels on the left half of the circle are flipped so they never read
    /// upside-down.
    pub fn for_angle(position: Point, angle: f64) -> Self {
        if angle > FRAC_PI_2 && angle < 3.0 * FRAC_PI_2 {
            Self {
                position,
                rotation: angle + PI,
                align: TextAlign::Right,
            }
        } else {
            Self {
                position,
                rotation: angle,
                align: TextAlign::Left,
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeGeometry {
    pub pid: u32,
    pub name: String,
    pub depth: usize,
    pub position: Point,
    pub cpu_percent: f64,
    pub color: Rgb,
    pub label: LabelGeometry,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeGeometry {
    pub parent: u32,
    pub child: u32,
    pub from: Point,
    pub to: Point,
    pub control: Point,
    pub color: Rgb,
}

impl EdgeGeometry {
    /// Point on the cubic curve from `from` to `to` with both control points
    /// at `control`, for `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let inner = 3.0 * u * u * t + 3.0 * u * t * t;
        Point::new(
            u * u * u * self.from.x + inner * self.control.x + t * t * t * self.to.x,
            u * u * u * self.from.y + inner * self.control.y + t * t * t * self.to.y,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    fn around(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    fn include(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// Everything the painter needs for one poll cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Scene {
    pub nodes: Vec<NodeGeometry>,
    pub edges: Vec<EdgeGeometry>,
    pub bounds: Option<Bounds>,
}

impl Scene {
    pub fn project(
        forest: &ProcessForest,
        layout: &HashMap<u32, LayoutNode>,
        gradient: &HeatGradient,
    ) -> Self {
        let mut placed: Vec<&LayoutNode> = layout.values().collect();
        // HashMap order is arbitrary; draw shallow nodes first and keep output stable.
        placed.sort_by_key(|n| (n.depth, n.pid));

        let mut nodes = Vec::with_capacity(placed.len());
        let mut edges = Vec::with_capacity(placed.len());
        let mut bounds: Option<Bounds> = None;

        for item in placed {
            let Some(process) = forest.get(item.pid) else {
                continue;
            };
            let color = gradient.color_for(process.cpu_percent);

            let extent = bounds.get_or_insert_with(|| Bounds::around(item.position));
            extent.include(item.position);
            extent.include(item.anchor);

            nodes.push(NodeGeometry {
                pid: item.pid,
                name: process.display_name.clone(),
                depth: item.depth,
                position: item.position,
                cpu_percent: process.cpu_percent,
                color,
                label: LabelGeometry::for_angle(item.position, item.angle),
            });

            let (Some(parent_pid), Some(control)) = (item.parent, item.control) else {
                continue;
            };
            let Some(parent) = layout.get(&parent_pid) else {
                continue;
            };
            extent.include(control);
            edges.push(EdgeGeometry {
                parent: parent_pid,
                child: item.pid,
                from: parent.anchor,
                to: item.position,
                control,
                color,
            });
        }

        Scene {
            nodes,
            edges,
            bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, pid: u32) -> Option<&NodeGeometry> {
        self.nodes.iter().find(|n| n.pid == pid)
    }
}
