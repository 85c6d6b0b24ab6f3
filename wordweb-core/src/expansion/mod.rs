// Expansion state machine.
//
// Per node:  Collapsed --trigger--> Loading --words--> Expanded (0+ children)
//                                           \--error--> Collapsed (retryable)
//
// - word_source: the trait for whatever produces related words, plus response helpers
// - session: MindMap, the synchronous owner of the tree (begin / complete / fail steps)
// - controller: async driver that runs those steps around a WordSource call
//
// Every trigger captures the session epoch in a ticket. reset() bumps the epoch, so a
// result that arrives for a tree that no longer exists is dropped instead of merged.

use serde::{Deserialize, Serialize};

use crate::tree::{Node, NodeId};

pub mod controller;
pub mod session;
pub mod word_source;

pub use controller::ExpansionController;
pub use session::MindMap;
pub use word_source::{
    WordSource, filter_unique_words, parse_related_words, related_words_prompt,
    related_words_schema,
};

/// Message shown to the user when a word source call fails.
pub const FAILED_MESSAGE: &str = "Failed to generate words. Please try again.";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionState {
    Collapsed,
    Loading,
    Expanded,
}

impl ExpansionState {
    pub fn of(node: &Node) -> Self {
        if node.is_expanded {
            ExpansionState::Expanded
        } else if node.is_loading {
            ExpansionState::Loading
        } else {
            ExpansionState::Collapsed
        }
    }
}

/// Everything captured when an expansion is triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionTicket {
    pub epoch: u64,
    pub node_id: NodeId,
    pub word: String,
    /// The whole tree vocabulary at trigger time, for the word source to avoid.
    pub existing_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpansionOutcome {
    /// New children were attached.
    Expanded { children: Vec<NodeId> },
    /// Every suggested word was already in the tree; the node is now a leaf.
    Exhausted,
    /// The word source failed; the node is collapsed again.
    Failed { message: String },
    /// The node was already loading or expanded; nothing happened.
    Skipped,
    /// The tree was reset while the request was in flight; the result was dropped.
    Stale,
}
