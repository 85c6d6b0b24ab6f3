// Collision resolver: pairwise circle relaxation over the whole tree.
//
// Each node is a circle whose diameter depends on its depth. For a fixed number of
// passes, every unordered pair (in store insertion order) that sits closer than the
// required separation is pushed apart along the line between the two centers, each
// node taking half the overlap. The root never moves but still pushes others.
//
// This is best-effort. Small clusters settle fully; dense fans of same-depth siblings
// may keep some residual overlap after the last pass. Cost is O(iterations * n^2).

use tracing::debug;

use super::{required_separation, LayoutConfig};
use crate::tree::{NodeId, Patch, Point, Snapshot};

/// Direction step used when two centers coincide exactly.
const GOLDEN_ANGLE: f64 = 2.399963229728653;

/// Working record for one node during relaxation.
#[derive(Debug, Clone)]
struct Body {
    id: NodeId,
    position: Point,
    depth: u32,
    anchored: bool,
}

/// Output of one resolver run. Independent of the snapshot it was computed from.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Final position of every node, in insertion order.
    pub positions: Vec<(NodeId, Point)>,
    /// Passes actually run (stops early once a pass moves nothing).
    pub passes: usize,
    /// Largest remaining shortfall from the required separation over all pairs.
    pub max_overlap: f64,
}

impl Resolution {
    pub fn position_of(&self, id: &NodeId) -> Option<Point> {
        self.positions.iter().find(|(nid, _)| nid == id).map(|(_, p)| *p)
    }

    /// Patch moving every node whose position differs from `base`.
    pub fn into_patch(self, base: &Snapshot) -> Patch {
        self.positions
            .into_iter()
            .filter(|(id, p)| base.get(id).map(|n| n.position != *p).unwrap_or(false))
            .fold(Patch::new(), |patch, (id, p)| patch.move_to(id, p))
    }
}

/// Relax all nodes of `snapshot` apart. The snapshot itself is not touched.
pub fn resolve_collisions(snapshot: &Snapshot, cfg: &LayoutConfig) -> Resolution {
    let mut bodies: Vec<Body> = snapshot
        .ordered()
        .into_iter()
        .map(|n| Body {
            id: n.id.clone(),
            position: n.position,
            depth: n.depth,
            anchored: n.depth == 0,
        })
        .collect();

    let mut passes = 0;
    for _pass in 0..cfg.iterations {
        passes += 1;
        if !relax_pass(&mut bodies, cfg) {
            break;
        }
    }

    let max_overlap = bodies_max_overlap(&bodies, cfg);
    debug!(nodes = bodies.len(), passes, max_overlap, "collision relaxation finished");

    Resolution {
        positions: bodies.into_iter().map(|b| (b.id, b.position)).collect(),
        passes,
        max_overlap,
    }
}

/// One sweep over all pairs. Returns whether anything moved.
fn relax_pass(bodies: &mut [Body], cfg: &LayoutConfig) -> bool {
    let mut any_moved = false;
    let n = bodies.len();

    for j in 0..n {
        for k in (j + 1)..n {
            let a = &bodies[j];
            let b = &bodies[k];

            let dx = b.position.x - a.position.x;
            let dy = b.position.y - a.position.y;
            let raw = (dx * dx + dy * dy).sqrt();

            // Coincident centers: distance counts as 1, but unlike a plain divide-by-1 of the
            // zero vector the pair separates along a fixed per-index direction.
            let (distance, ux, uy) = if raw == 0.0 {
                let theta = k as f64 * GOLDEN_ANGLE;
                (1.0, theta.cos(), theta.sin())
            } else {
                (raw, dx / raw, dy / raw)
            };

            let min_distance = required_separation(a.depth, b.depth, cfg);
            if distance >= min_distance {
                continue;
            }

            let overlap = min_distance - distance;
            let fx = ux * overlap * cfg.push_factor;
            let fy = uy * overlap * cfg.push_factor;

            if !bodies[j].anchored {
                bodies[j].position.x -= fx;
                bodies[j].position.y -= fy;
                any_moved = true;
            }
            if !bodies[k].anchored {
                bodies[k].position.x += fx;
                bodies[k].position.y += fy;
                any_moved = true;
            }
        }
    }

    any_moved
}

fn bodies_max_overlap(bodies: &[Body], cfg: &LayoutConfig) -> f64 {
    let mut worst = 0.0f64;
    for (j, a) in bodies.iter().enumerate() {
        for b in &bodies[j + 1..] {
            let shortfall =
                required_separation(a.depth, b.depth, cfg) - a.position.distance_to(&b.position);
            worst = worst.max(shortfall);
        }
    }
    worst
}

/// Largest overlap between any two nodes of `snapshot` (0 when none overlap).
pub fn max_overlap(snapshot: &Snapshot, cfg: &LayoutConfig) -> f64 {
    let bodies: Vec<Body> = snapshot
        .ordered()
        .into_iter()
        .map(|n| Body {
            id: n.id.clone(),
            position: n.position,
            depth: n.depth,
            anchored: n.depth == 0,
        })
        .collect();
    bodies_max_overlap(&bodies, cfg)
}
