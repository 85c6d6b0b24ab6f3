//! Error type shared by the store, the layout pipeline and the expansion controller.

use thiserror::Error;

use crate::tree::NodeId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("word source failed: {0}")]
    WordSource(String),

    #[error("malformed word source response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node id already in use: {0}")]
    DuplicateNode(NodeId),

    #[error("node {id} references missing parent {parent}")]
    DanglingParent { id: NodeId, parent: NodeId },

    #[error("node {id} has depth {depth}, expected {expected}")]
    DepthMismatch { id: NodeId, depth: u32, expected: u32 },

    #[error("tree already has a root, cannot insert parentless node {0}")]
    MultipleRoots(NodeId),

    #[error("node {0} cannot be loading and expanded at the same time")]
    ConflictingFlags(NodeId),

    #[error("node {0} is expanded and cannot collapse again")]
    ExpandedReverted(NodeId),

    #[error("root word must not be empty")]
    EmptyWord,

    #[error("invalid engine config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
