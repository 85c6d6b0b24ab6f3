// Radial child placement ("orbital" layout for one expansion).
//
// Given a node being expanded and the words revealed under it, place each new child
// on a ring around the parent:
// - Root: children spread over the full circle, first one straight up
// - Anything else: children spread over an arc centred on the direction the parent
//   was reached from (grandparent -> parent), leaving the back side free
//
// Ring radius shrinks with depth down to a floor. No overlap avoidance happens here;
// the collision pass does that afterwards.

use std::f64::consts::PI;

use super::LayoutConfig;
use crate::tree::{Node, Point};

/// Ring radius for children of a node at `parent_depth`.
pub fn ring_radius(parent_depth: u32, cfg: &LayoutConfig) -> f64 {
    (cfg.radius_scale / (parent_depth as f64 + cfg.depth_offset)).max(cfg.min_radius)
}

/// Angle of the `i`-th of `k` children.
fn child_angle(i: usize, k: usize, is_root: bool, incoming: f64, cfg: &LayoutConfig) -> f64 {
    if is_root {
        // Full circle wraps, so k (not k-1) slots avoid doubling up on the start.
        let arc = 2.0 * PI;
        cfg.reference_angle + (i as f64 / k as f64) * arc
    } else {
        let arc = cfg.child_arc;
        let start = incoming - arc / 2.0;
        if k > 1 {
            start + (i as f64 / (k - 1) as f64) * arc
        } else {
            start + arc / 2.0
        }
    }
}

/// Compute the new child nodes of `parent`, one per word, in word order.
///
/// `grandparent` must be the parent's own parent (None for the root). Returned nodes are
/// collapsed, not loading, and carry ids `{parent}-{i}`.
pub fn place_children(
    parent: &Node,
    grandparent: Option<&Node>,
    words: &[String],
    cfg: &LayoutConfig,
) -> Vec<Node> {
    let k = words.len();
    if k == 0 {
        return Vec::new();
    }

    let is_root = grandparent.is_none();
    let incoming = grandparent
        .map(|gp| gp.position.angle_to(&parent.position))
        .unwrap_or(cfg.reference_angle);
    let radius = ring_radius(parent.depth, cfg);

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let angle = child_angle(i, k, is_root, incoming, cfg);
            Node {
                id: parent.id.child(i),
                word: word.clone(),
                parent: Some(parent.id.clone()),
                position: Point::new(
                    parent.position.x + radius * angle.cos(),
                    parent.position.y + radius * angle.sin(),
                ),
                depth: parent.depth + 1,
                is_expanded: false,
                is_loading: false,
                order: 0,
            }
        })
        .collect()
}
