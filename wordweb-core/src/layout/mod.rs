// Mind-map layout engine.
//
// Two deterministic passes run after every expansion:
// - radial_placement: put the new children of one node on an arc around it
// - collision: relax the whole node set so circular footprints stop overlapping
//
// Plus edges: curve geometry for parent -> child links, consumed by the renderer.
//
// Everything here is pure: functions read a Snapshot (or plain nodes) and return
// new data. Committing results is the caller's job.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub mod collision;
pub mod edges;
pub mod radial_placement;

pub use collision::{max_overlap, resolve_collisions, Resolution};
pub use edges::{edge_geometry, EdgeGeometry};
pub use radial_placement::{place_children, ring_radius};

/// Tuned layout constants. Every field has a default, so partial JSON configs work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Direction of the first root child, in radians. -PI/2 points up.
    pub reference_angle: f64,
    /// Angular span used for children of non-root nodes.
    pub child_arc: f64,
    /// Ring radius never drops below this.
    pub min_radius: f64,
    /// radius = radius_scale / (parent depth + depth_offset)
    pub radius_scale: f64,
    pub depth_offset: f64,
    /// Footprint diameter at depth 0.
    pub node_size_base: f64,
    /// Footprint shrink per depth level.
    pub node_size_step: f64,
    pub min_node_size: f64,
    /// Extra gap required between two footprints.
    pub padding: f64,
    /// Relaxation passes for the collision resolver.
    pub iterations: usize,
    /// Fraction of the overlap each node of a pair moves per step.
    pub push_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reference_angle: -PI / 2.0,
            child_arc: 4.0 / 3.0 * PI,
            min_radius: 120.0,
            radius_scale: 350.0,
            depth_offset: 1.5,
            node_size_base: 90.0,
            node_size_step: 10.0,
            min_node_size: 40.0,
            padding: 10.0,
            iterations: 50,
            push_factor: 0.5,
        }
    }
}

/// Rendered diameter of a node at `depth`. Shallower nodes are larger.
pub fn node_size(depth: u32, cfg: &LayoutConfig) -> f64 {
    (cfg.node_size_base - cfg.node_size_step * depth as f64).max(cfg.min_node_size)
}

/// Minimum center-to-center distance between two nodes.
pub fn required_separation(depth_a: u32, depth_b: u32, cfg: &LayoutConfig) -> f64 {
    node_size(depth_a, cfg) / 2.0 + node_size(depth_b, cfg) / 2.0 + cfg.padding
}
