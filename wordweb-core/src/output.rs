//! Output types for the rendering front-end.
//!
//! These structs are serialized to JSON and handed to whatever draws the map. They are a
//! detached copy of one snapshot; the renderer never sees live tree state.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::expansion::ExpansionState;
use crate::layout::{edge_geometry, node_size};
use crate::tree::{NodeId, Point, Snapshot};

/// A node ready for display
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    pub id: String,
    pub word: String,
    pub parent: Option<String>,
    /// Center of the node circle
    pub position: Point,
    pub depth: u32,
    /// Circle diameter
    pub size: f64,
    pub state: ExpansionState,
}

/// A parent -> child link
#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutput {
    pub from: String,
    pub to: String,
    pub start: Point,
    pub control: Point,
    pub end: Point,
    /// SVG path data ("M .. Q ..")
    pub path: String,
}

/// Error information for the front-end banner
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// The combined output sent to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct MapOutput {
    pub map_size: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeOutput>,
    /// Node the view should scroll to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

pub fn render_map(
    snapshot: &Snapshot,
    config: &EngineConfig,
    focus: Option<&NodeId>,
    error: Option<&str>,
) -> MapOutput {
    let layout = &config.layout;
    let ordered = snapshot.ordered();

    let nodes = ordered
        .iter()
        .map(|n| NodeOutput {
            id: n.id.0.clone(),
            word: n.word.clone(),
            parent: n.parent.as_ref().map(|p| p.0.clone()),
            position: n.position,
            depth: n.depth,
            size: node_size(n.depth, layout),
            state: ExpansionState::of(n),
        })
        .collect();

    let edges = ordered
        .iter()
        .filter_map(|child| {
            let parent = snapshot.parent_of(child)?;
            let geometry = edge_geometry(parent, child, layout)?;
            Some(EdgeOutput {
                from: parent.id.0.clone(),
                to: child.id.0.clone(),
                start: geometry.start,
                control: geometry.control,
                end: geometry.end,
                path: geometry.svg_path(),
            })
        })
        .collect();

    MapOutput {
        map_size: config.map_size,
        nodes,
        edges,
        focus: focus.map(|id| id.0.clone()),
        error: error.map(|message| ErrorInfo { message: message.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::MindMap;

    #[test]
    fn test_render_empty_map() {
        let map = MindMap::new(EngineConfig::default());
        let json = serde_json::to_value(map.render()).unwrap();
        assert_eq!(json, serde_json::json!({ "map_size": 4000.0 }));
    }

    #[test]
    fn test_render_nodes_and_edges() {
        let mut map = MindMap::new(EngineConfig::default());
        let ticket = map.start("Creativity").unwrap();
        map.complete_expansion(&ticket, &["Art".to_string(), "Music".to_string()]).unwrap();

        let out = map.render();
        assert_eq!(out.nodes.len(), 3);
        assert_eq!(out.edges.len(), 2);
        assert_eq!(out.nodes[0].id, "root");
        assert_eq!(out.nodes[0].size, 90.0);
        assert_eq!(out.nodes[0].state, ExpansionState::Expanded);
        assert_eq!(out.nodes[1].parent.as_deref(), Some("root"));
        assert_eq!(out.nodes[1].size, 80.0);
        assert_eq!(out.edges[0].from, "root");
        assert_eq!(out.edges[0].to, "root-0");
        assert!(out.edges[0].path.starts_with("M "));
        assert_eq!(out.focus.as_deref(), Some("root"));
        assert!(out.error.is_none());
    }

    #[test]
    fn test_render_loading_root_serializes_state() {
        let mut map = MindMap::new(EngineConfig::default());
        map.start("Creativity").unwrap();
        let json = serde_json::to_value(map.render()).unwrap();
        assert_eq!(json["nodes"][0]["state"], "loading");
        assert_eq!(json["focus"], "root");
        assert!(json.get("edges").is_none());
    }
}
