// Parent -> child link geometry.
//
// Links run between the two node circles (not the centers) and bow slightly to the
// left of the travel direction as a quadratic curve. Nodes whose circles touch or
// overlap get no link.

use serde::Serialize;

use super::{node_size, LayoutConfig};
use crate::tree::{Node, Point};

/// Bend as a fraction of chord length.
const CURVE_RATIO: f64 = 0.2;
/// Maximum bend, in pixels.
const MAX_CURVE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeGeometry {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl EdgeGeometry {
    /// SVG path data for the curve.
    pub fn svg_path(&self) -> String {
        format!(
            "M {},{} Q {},{} {},{}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}

pub fn edge_geometry(parent: &Node, child: &Node, cfg: &LayoutConfig) -> Option<EdgeGeometry> {
    let dx = child.position.x - parent.position.x;
    let dy = child.position.y - parent.position.y;
    let dist = (dx * dx + dy * dy).sqrt();

    let parent_radius = node_size(parent.depth, cfg) / 2.0;
    let child_radius = node_size(child.depth, cfg) / 2.0;
    if dist <= parent_radius + child_radius {
        return None;
    }

    let (ux, uy) = (dx / dist, dy / dist);
    let start = Point::new(
        parent.position.x + ux * parent_radius,
        parent.position.y + uy * parent_radius,
    );
    let end = Point::new(
        child.position.x - ux * child_radius,
        child.position.y - uy * child_radius,
    );

    let chord = start.distance_to(&end);
    let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    // Perpendicular of the chord direction.
    let (px, py) = (-(end.y - start.y) / chord, (end.x - start.x) / chord);
    let bend = (chord * CURVE_RATIO).min(MAX_CURVE);

    Some(EdgeGeometry {
        start,
        control: Point::new(mid.x + px * bend, mid.y + py * bend),
        end,
    })
}
