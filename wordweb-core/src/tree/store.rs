//
// Tree store: the single owner of the id -> node map.
//
// Every mutation is a Patch merged into a fresh copy of the current map, so a
// Snapshot handed out earlier never changes underneath its holder. A patch is
// validated as a whole; if any change breaks a tree invariant nothing is committed.
//
// Nodes are only ever added or have their flags/positions updated. Removal happens
// solely through reset(), which drops the whole map.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Node, NodeId, Point};
use crate::error::{Error, Result};

/// Immutable view of the tree at one point in time. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    nodes: Arc<HashMap<NodeId, Node>>,
}

impl Snapshot {
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.values().find(|n| n.is_root())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn ordered(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        nodes.sort_by_key(|n| n.order);
        nodes
    }

    /// Every word in the tree, in insertion order.
    pub fn words(&self) -> Vec<String> {
        self.ordered().into_iter().map(|n| n.word.clone()).collect()
    }

    pub fn children_of(&self, id: &NodeId) -> Vec<&Node> {
        self.ordered()
            .into_iter()
            .filter(|n| n.parent.as_ref() == Some(id))
            .collect()
    }

    pub fn parent_of(&self, node: &Node) -> Option<&Node> {
        node.parent.as_ref().and_then(|pid| self.nodes.get(pid))
    }
}

#[derive(Debug, Clone)]
enum Change {
    Insert(Node),
    Flags {
        id: NodeId,
        is_loading: Option<bool>,
        is_expanded: Option<bool>,
    },
    Move {
        id: NodeId,
        position: Point,
    },
}

/// A batch of node insertions and updates, applied in order by [`TreeStore::merge_snapshot`].
#[derive(Debug, Clone, Default)]
pub struct Patch {
    changes: Vec<Change>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new node. Its `order` is overwritten by the store.
    pub fn insert(mut self, node: Node) -> Self {
        self.changes.push(Change::Insert(node));
        self
    }

    pub fn set_loading(mut self, id: NodeId, is_loading: bool) -> Self {
        self.changes.push(Change::Flags { id, is_loading: Some(is_loading), is_expanded: None });
        self
    }

    /// Terminal transition of an expansion: expanded, no longer loading.
    pub fn mark_expanded(mut self, id: NodeId) -> Self {
        self.changes.push(Change::Flags { id, is_loading: Some(false), is_expanded: Some(true) });
        self
    }

    pub fn move_to(mut self, id: NodeId, position: Point) -> Self {
        self.changes.push(Change::Move { id, position });
        self
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TreeStore {
    nodes: Arc<HashMap<NodeId, Node>>,
    next_order: usize,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { nodes: Arc::clone(&self.nodes) }
    }

    /// Replace the whole map with a single loading root.
    pub fn init_root(&mut self, word: impl Into<String>, position: Point) -> Result<Snapshot> {
        self.reset();
        self.merge_snapshot(Patch::new().insert(Node::new_root(word, position)))
    }

    /// Apply `patch` on top of the current map and commit it as the new snapshot.
    /// Returns the committed snapshot. On error the store is left unchanged.
    pub fn merge_snapshot(&mut self, patch: Patch) -> Result<Snapshot> {
        let mut next: HashMap<NodeId, Node> = (*self.nodes).clone();
        let mut next_order = self.next_order;
        let mut touched: Vec<NodeId> = Vec::with_capacity(patch.len());

        for change in patch.changes {
            match change {
                Change::Insert(mut node) => {
                    if next.contains_key(&node.id) {
                        return Err(Error::DuplicateNode(node.id));
                    }
                    let expected = match &node.parent {
                        None => {
                            if next.values().any(|n| n.is_root()) {
                                return Err(Error::MultipleRoots(node.id));
                            }
                            0
                        }
                        Some(pid) => match next.get(pid) {
                            Some(parent) => parent.depth + 1,
                            None => {
                                return Err(Error::DanglingParent {
                                    id: node.id,
                                    parent: pid.clone(),
                                });
                            }
                        },
                    };
                    if node.depth != expected {
                        return Err(Error::DepthMismatch {
                            id: node.id,
                            depth: node.depth,
                            expected,
                        });
                    }
                    node.order = next_order;
                    next_order += 1;
                    touched.push(node.id.clone());
                    next.insert(node.id.clone(), node);
                }
                Change::Flags { id, is_loading, is_expanded } => {
                    let node = next.get_mut(&id).ok_or_else(|| Error::NodeNotFound(id.clone()))?;
                    if let Some(expanded) = is_expanded {
                        if node.is_expanded && !expanded {
                            return Err(Error::ExpandedReverted(id));
                        }
                        node.is_expanded = expanded;
                    }
                    if let Some(loading) = is_loading {
                        node.is_loading = loading;
                    }
                    touched.push(id);
                }
                Change::Move { id, position } => {
                    let node = next.get_mut(&id).ok_or_else(|| Error::NodeNotFound(id.clone()))?;
                    node.position = position;
                }
            }
        }

        // Flags are checked once the whole patch is applied, so a patch may clear
        // loading and set expanded in either order.
        for id in touched {
            if let Some(n) = next.get(&id) {
                if n.is_loading && n.is_expanded {
                    return Err(Error::ConflictingFlags(id));
                }
            }
        }

        self.nodes = Arc::new(next);
        self.next_order = next_order;
        Ok(self.snapshot())
    }

    pub fn reset(&mut self) {
        self.nodes = Arc::new(HashMap::new());
        self.next_order = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_child(parent: &Node, index: usize, word: &str) -> Node {
        Node {
            id: parent.id.child(index),
            word: word.to_string(),
            parent: Some(parent.id.clone()),
            position: Point::new(parent.position.x + 100.0, parent.position.y),
            depth: parent.depth + 1,
            is_expanded: false,
            is_loading: false,
            order: 0,
        }
    }

    fn make_store_with_root() -> (TreeStore, Node) {
        let mut store = TreeStore::new();
        let snap = store.init_root("Creativity", Point::new(2000.0, 2000.0)).unwrap();
        let root = snap.root().unwrap().clone();
        (store, root)
    }

    #[test]
    fn test_init_root_is_loading() {
        let (store, root) = make_store_with_root();
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(root.id, NodeId::root());
        assert_eq!(root.depth, 0);
        assert!(root.is_loading);
        assert!(!root.is_expanded);
    }

    #[test]
    fn test_init_root_replaces_existing_tree() {
        let (mut store, root) = make_store_with_root();
        store
            .merge_snapshot(Patch::new().insert(make_child(&root, 0, "Art")))
            .unwrap();
        let snap = store.init_root("Music", Point::new(0.0, 0.0)).unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.root().unwrap().word, "Music");
    }

    #[test]
    fn test_merge_inserts_children_and_flags_in_one_commit() {
        let (mut store, root) = make_store_with_root();
        let snap = store
            .merge_snapshot(
                Patch::new()
                    .insert(make_child(&root, 0, "Art"))
                    .insert(make_child(&root, 1, "Music"))
                    .mark_expanded(root.id.clone()),
            )
            .unwrap();

        assert_eq!(snap.len(), 3);
        let r = snap.get(&root.id).unwrap();
        assert!(r.is_expanded);
        assert!(!r.is_loading);
        assert_eq!(snap.words(), vec!["Creativity", "Art", "Music"]);
        assert_eq!(snap.children_of(&root.id).len(), 2);
    }

    #[test]
    fn test_old_snapshot_is_not_mutated() {
        let (mut store, root) = make_store_with_root();
        let before = store.snapshot();
        store
            .merge_snapshot(
                Patch::new()
                    .insert(make_child(&root, 0, "Art"))
                    .mark_expanded(root.id.clone()),
            )
            .unwrap();

        assert_eq!(before.len(), 1);
        assert!(before.get(&root.id).unwrap().is_loading);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_dangling_parent_rejected() {
        let (mut store, root) = make_store_with_root();
        let mut orphan = make_child(&root, 0, "Art");
        orphan.parent = Some(NodeId::from("nowhere"));
        let err = store.merge_snapshot(Patch::new().insert(orphan)).unwrap_err();
        assert!(matches!(err, Error::DanglingParent { .. }));
    }

    #[test]
    fn test_depth_mismatch_rejected() {
        let (mut store, root) = make_store_with_root();
        let mut child = make_child(&root, 0, "Art");
        child.depth = 3;
        let err = store.merge_snapshot(Patch::new().insert(child)).unwrap_err();
        assert!(matches!(err, Error::DepthMismatch { depth: 3, expected: 1, .. }));
    }

    #[test]
    fn test_second_root_rejected() {
        let (mut store, _root) = make_store_with_root();
        let mut other = Node::new_root("Other", Point::new(0.0, 0.0));
        other.id = NodeId::from("other");
        let err = store.merge_snapshot(Patch::new().insert(other)).unwrap_err();
        assert!(matches!(err, Error::MultipleRoots(_)));
    }

    #[test]
    fn test_rejected_patch_commits_nothing() {
        let (mut store, root) = make_store_with_root();
        let good = make_child(&root, 0, "Art");
        let duplicate = make_child(&root, 0, "Art again");
        let err = store
            .merge_snapshot(
                Patch::new()
                    .insert(good)
                    .mark_expanded(root.id.clone())
                    .insert(duplicate),
            )
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateNode(_)));
        let snap = store.snapshot();
        assert_eq!(snap.len(), 1);
        assert!(snap.get(&root.id).unwrap().is_loading);
    }

    #[test]
    fn test_expanded_never_reverts() {
        let (mut store, root) = make_store_with_root();
        store.merge_snapshot(Patch::new().mark_expanded(root.id.clone())).unwrap();

        let mut reverted = Patch::new();
        reverted.changes.push(Change::Flags {
            id: root.id.clone(),
            is_loading: None,
            is_expanded: Some(false),
        });
        let err = store.merge_snapshot(reverted).unwrap_err();
        assert!(matches!(err, Error::ExpandedReverted(_)));
    }

    #[test]
    fn test_loading_and_expanded_conflict() {
        let (mut store, root) = make_store_with_root();
        store.merge_snapshot(Patch::new().mark_expanded(root.id.clone())).unwrap();
        let err = store
            .merge_snapshot(Patch::new().set_loading(root.id.clone(), true))
            .unwrap_err();
        assert!(matches!(err, Error::ConflictingFlags(_)));
    }

    #[test]
    fn test_move_unknown_node_rejected() {
        let (mut store, _root) = make_store_with_root();
        let err = store
            .merge_snapshot(Patch::new().move_to(NodeId::from("ghost"), Point::new(1.0, 1.0)))
            .unwrap_err();
        assert!(matches!(err, Error::NodeNotFound(_)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut store, root) = make_store_with_root();
        store.merge_snapshot(Patch::new().insert(make_child(&root, 0, "Art"))).unwrap();
        store.reset();
        assert!(store.snapshot().is_empty());
        assert!(store.snapshot().root().is_none());
    }

    #[test]
    fn test_order_follows_insertion() {
        let (mut store, root) = make_store_with_root();
        let snap = store
            .merge_snapshot(
                Patch::new()
                    .insert(make_child(&root, 1, "B"))
                    .insert(make_child(&root, 0, "A")),
            )
            .unwrap();
        let order: Vec<&str> = snap.ordered().iter().map(|n| n.word.as_str()).collect();
        assert_eq!(order, vec!["Creativity", "B", "A"]);
    }
}
