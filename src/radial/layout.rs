use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use unicode_width::UnicodeWidthStr;

use super::distribute::distribute;
use super::node::{LayoutNode, Point};
use super::tree::ProcessForest;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
    /// Distance from a parent's anchor (or the center, for roots) to a child.
    pub edge_radius: f64,
    /// Gap between the end of a label and the anchor its children hang off.
    pub label_padding: f64,
    pub min_angle_range: f64,
    pub max_angle_range: f64,
    /// Vertical bend of edge curves; negative bends upward.
    pub curve_offset: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            edge_radius: 500.0,
            label_padding: 30.0,
            min_angle_range: PI / 10.0,
            max_angle_range: FRAC_PI_2,
            curve_offset: -50.0,
        }
    }
}

/// Measures how long a label runs in scene units.
pub trait TextMeasure {
    fn width(&self, text: &str) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f64,
{
    fn width(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Terminal-cell measure: display width in cells times a fixed cell size.
#[derive(Clone, Copy, Debug)]
pub struct CellMeasure {
    pub cell_width: f64,
}

impl TextMeasure for CellMeasure {
    fn width(&self, text: &str) -> f64 {
        text.width() as f64 * self.cell_width
    }
}

/// Angular spread for a fan of `child_count` children.
///
/// Grows with `ln(count + 1) / ln(10)`, so it passes `max_angle_range` once
/// there are more than nine children. There is no cap.
pub fn angle_range(child_count: usize, params: &LayoutParams) -> f64 {
    if child_count <= 1 {
        return 0.0;
    }
    let span = params.max_angle_range - params.min_angle_range;
    params.min_angle_range + span * ((child_count + 1) as f64).ln() / 10f64.ln()
}

/// Places every node reachable from `root_ids`.
///
/// Roots sit on a circle of `edge_radius` around `center`, evenly spaced in
/// distributed order. Each child sits `edge_radius` past its parent's
/// anchor. The forest must be acyclic.
pub fn layout_roots<M: TextMeasure>(
    root_ids: &[u32],
    forest: &ProcessForest,
    center: Point,
    params: &LayoutParams,
    measure: &M,
) -> HashMap<u32, LayoutNode> {
    let mut walker = Walker {
        forest,
        params,
        measure,
        placed: HashMap::with_capacity(forest.len()),
    };

    let roots = distribute(root_ids, forest);
    if roots.is_empty() {
        return walker.placed;
    }

    let angle_step = TAU / roots.len() as f64;
    for (index, &pid) in roots.iter().enumerate() {
        let angle = index as f64 * angle_step;
        let position = center.offset(angle, params.edge_radius);
        walker.place(pid, None, 0, angle, position, None);
    }

    walker.placed
}

struct Walker<'a, M> {
    forest: &'a ProcessForest,
    params: &'a LayoutParams,
    measure: &'a M,
    placed: HashMap<u32, LayoutNode>,
}

impl<M: TextMeasure> Walker<'_, M> {
    fn place(
        &mut self,
        pid: u32,
        parent: Option<u32>,
        depth: usize,
        angle: f64,
        position: Point,
        control: Option<Point>,
    ) {
        let forest = self.forest;
        let Some(node) = forest.get(pid) else {
            return;
        };
        let anchor = label_anchor(position, angle, &node.display_name, self.params, self.measure);

        self.placed.insert(
            pid,
            LayoutNode {
                pid,
                parent,
                depth,
                angle,
                position,
                anchor,
                control,
            },
        );

        if !node.children.is_empty() {
            self.place_children(pid, depth + 1, angle, anchor);
        }
    }

    fn place_children(&mut self, pid: u32, depth: usize, parent_angle: f64, parent_anchor: Point) {
        let forest = self.forest;
        let Some(node) = forest.get(pid) else {
            return;
        };
        let children = distribute(&node.children, forest);
        let count = children.len();
        let range = angle_range(count, self.params);
        let step = if count > 1 {
            range / (count - 1) as f64
        } else {
            0.0
        };

        for (index, child) in children.into_iter().enumerate() {
            let angle = if count > 1 {
                parent_angle - range / 2.0 + index as f64 * step
            } else {
                parent_angle
            };
            let position = parent_anchor.offset(angle, self.params.edge_radius);
            let control = Point::new(
                (parent_anchor.x + position.x) / 2.0,
                parent_anchor.y + self.params.curve_offset,
            );
            self.place(child, Some(pid), depth, angle, position, Some(control));
        }
    }
}

fn label_anchor<M: TextMeasure>(
    position: Point,
    angle: f64,
    label: &str,
    params: &LayoutParams,
    measure: &M,
) -> Point {
    position.offset(angle, measure.width(label) + params.label_padding)
}
