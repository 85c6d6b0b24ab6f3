//
// Mind-map tree model.
//
// What lives here:
// - NodeId / Point / Node: the record for one revealed word
// - store: the authoritative id -> node map, committed as whole snapshots
//
// The tree is strict: one parentless root at depth 0, every other node one level
// below an existing parent. The store enforces this on every merge.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod store;

pub use store::{Patch, Snapshot, TreeStore};

/// Id assigned to the root of every tree.
pub const ROOT_ID: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn root() -> Self {
        NodeId(ROOT_ID.to_string())
    }

    /// Id of the `index`-th child revealed under `self`.
    pub fn child(&self, index: usize) -> Self {
        NodeId(format!("{}-{}", self.0, index))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle of the vector from `self` to `other`.
    pub fn angle_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub word: String,
    /// None => root
    pub parent: Option<NodeId>,
    pub position: Point,
    pub depth: u32,
    pub is_expanded: bool,
    pub is_loading: bool,
    /// Insertion index, assigned by the store. Stable iteration order for layout and rendering.
    pub order: usize,
}

impl Node {
    pub fn new_root(word: impl Into<String>, position: Point) -> Self {
        Self {
            id: NodeId::root(),
            word: word.into(),
            parent: None,
            position,
            depth: 0,
            is_expanded: false,
            is_loading: true,
            order: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
