// MindMap: one mind-map session.
//
// Owns the tree store and the bookkeeping around it (epoch, focus node, error message)
// and exposes expansion as three synchronous steps:
//
//   begin_expansion(id)            -> ticket (node now loading) or None (guarded no-op)
//   complete_expansion(ticket, ws) -> place children, commit, relax, commit
//   fail_expansion(ticket, msg)    -> node back to collapsed, error recorded
//
// Whoever calls the word source in between (the async controller, or JS through the
// wasm bridge) just hands the ticket back.

use tracing::{debug, info, warn};

use super::word_source::filter_unique_words;
use super::{ExpansionOutcome, ExpansionState, ExpansionTicket, FAILED_MESSAGE};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::layout::{place_children, resolve_collisions};
use crate::output::{render_map, MapOutput};
use crate::tree::{NodeId, Patch, Snapshot, TreeStore};

#[derive(Debug, Default)]
pub struct MindMap {
    config: EngineConfig,
    store: TreeStore,
    epoch: u64,
    /// Node the view should follow: the last one an expansion was triggered on.
    focus: Option<NodeId>,
    error: Option<String>,
}

impl MindMap {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn focus(&self) -> Option<&NodeId> {
        self.focus.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state_of(&self, id: &NodeId) -> Option<ExpansionState> {
        self.store.snapshot().get(id).map(ExpansionState::of)
    }

    /// Start a new session rooted at `word`. The root is created loading, so the returned
    /// ticket is its first expansion; `begin_expansion` is not needed.
    pub fn start(&mut self, word: &str) -> Result<ExpansionTicket> {
        let word = word.trim();
        if word.is_empty() {
            return Err(Error::EmptyWord);
        }

        self.reset();
        let snap = self.store.init_root(word, self.config.center())?;
        let root = snap.root().ok_or_else(|| Error::NodeNotFound(NodeId::root()))?;
        self.focus = Some(root.id.clone());
        info!(word, epoch = self.epoch, "started new mind map");

        Ok(ExpansionTicket {
            epoch: self.epoch,
            node_id: root.id.clone(),
            word: root.word.clone(),
            existing_words: snap.words(),
        })
    }

    /// Mark `id` as loading and hand out a ticket for its word source call.
    /// Returns None when the node is already loading or expanded.
    pub fn begin_expansion(&mut self, id: &NodeId) -> Result<Option<ExpansionTicket>> {
        let snap = self.store.snapshot();
        let node = snap.get(id).ok_or_else(|| Error::NodeNotFound(id.clone()))?;

        if node.is_expanded || node.is_loading {
            debug!(node = %id, state = ?ExpansionState::of(node), "expansion skipped");
            return Ok(None);
        }

        let snap = self.store.merge_snapshot(Patch::new().set_loading(id.clone(), true))?;
        self.focus = Some(id.clone());
        debug!(node = %id, epoch = self.epoch, "expansion triggered");

        Ok(Some(ExpansionTicket {
            epoch: self.epoch,
            node_id: id.clone(),
            word: node.word.clone(),
            existing_words: snap.words(),
        }))
    }

    /// Whether `ticket` still refers to a loading node of the current tree.
    fn is_current(&self, ticket: &ExpansionTicket) -> bool {
        ticket.epoch == self.epoch
            && self
                .store
                .snapshot()
                .get(&ticket.node_id)
                .map(|n| n.is_loading)
                .unwrap_or(false)
    }

    /// Attach the words returned for `ticket` as children of its node.
    pub fn complete_expansion(
        &mut self,
        ticket: &ExpansionTicket,
        words: &[String],
    ) -> Result<ExpansionOutcome> {
        if !self.is_current(ticket) {
            debug!(
                node = %ticket.node_id,
                epoch = ticket.epoch,
                current = self.epoch,
                "dropping stale expansion result"
            );
            return Ok(ExpansionOutcome::Stale);
        }

        match self.attach_children(ticket, words) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // Leave the node retryable rather than stuck loading.
                self.store.merge_snapshot(Patch::new().set_loading(ticket.node_id.clone(), false))?;
                Err(e)
            }
        }
    }

    fn attach_children(
        &mut self,
        ticket: &ExpansionTicket,
        words: &[String],
    ) -> Result<ExpansionOutcome> {
        let snap = self.store.snapshot();
        // Re-filter against the tree as it is now; other expansions may have landed meanwhile.
        let unique = filter_unique_words(words, &snap.words());
        let id = &ticket.node_id;

        if unique.is_empty() {
            self.store.merge_snapshot(Patch::new().mark_expanded(id.clone()))?;
            info!(node = %id, offered = words.len(), "no new words, node is a leaf");
            return Ok(ExpansionOutcome::Exhausted);
        }

        let parent = snap.get(id).ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        let grandparent = snap.parent_of(parent);
        let children = place_children(parent, grandparent, &unique, &self.config.layout);
        let child_ids: Vec<NodeId> = children.iter().map(|c| c.id.clone()).collect();

        let patch = children
            .into_iter()
            .fold(Patch::new(), |patch, child| patch.insert(child))
            .mark_expanded(id.clone());
        let merged = self.store.merge_snapshot(patch)?;

        let resolution = resolve_collisions(&merged, &self.config.layout);
        self.store.merge_snapshot(resolution.into_patch(&merged))?;

        info!(node = %id, children = child_ids.len(), "expansion committed");
        Ok(ExpansionOutcome::Expanded { children: child_ids })
    }

    /// Record a failed word source call for `ticket`. The node goes back to collapsed.
    pub fn fail_expansion(
        &mut self,
        ticket: &ExpansionTicket,
        message: &str,
    ) -> Result<ExpansionOutcome> {
        if !self.is_current(ticket) {
            debug!(node = %ticket.node_id, "dropping stale expansion failure");
            return Ok(ExpansionOutcome::Stale);
        }

        self.store.merge_snapshot(Patch::new().set_loading(ticket.node_id.clone(), false))?;
        self.error = Some(FAILED_MESSAGE.to_string());
        warn!(node = %ticket.node_id, reason = message, "word source failed");

        Ok(ExpansionOutcome::Failed { message: message.to_string() })
    }

    /// Drop the tree, the focus and the error. In-flight tickets become stale.
    pub fn reset(&mut self) {
        self.store.reset();
        self.epoch += 1;
        self.focus = None;
        self.error = None;
        debug!(epoch = self.epoch, "mind map reset");
    }

    /// Renderable view of the current state.
    pub fn render(&self) -> MapOutput {
        render_map(
            &self.store.snapshot(),
            &self.config,
            self.focus.as_ref(),
            self.error.as_deref(),
        )
    }
}
