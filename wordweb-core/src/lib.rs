//! WordWeb core: layout and expansion engine for an expandable radial mind map.
//!
//! A map starts from one root word. Expanding a node asks a [`WordSource`] for related
//! words, places them on an arc around the node, then nudges the whole tree apart so no
//! two node circles overlap.

pub mod config;
pub mod error;
pub mod expansion;
pub mod layout;
pub mod output;
pub mod tree;
mod wasm;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use expansion::{
    ExpansionController, ExpansionOutcome, ExpansionState, ExpansionTicket, MindMap, WordSource,
};
pub use layout::LayoutConfig;
pub use output::MapOutput;
pub use tree::{Node, NodeId, Point, Snapshot, TreeStore};
