//! Async expansion driver.
//!
//! Wraps a [`MindMap`] in a `tokio` mutex and a [`WordSource`]. The lock is taken only for
//! the synchronous begin/complete steps and is never held across the word source call, so
//! any number of nodes can be loading at once.

use tokio::sync::Mutex;
use tracing::debug;

use super::{ExpansionOutcome, ExpansionTicket, MindMap, WordSource};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::output::MapOutput;
use crate::tree::{NodeId, Snapshot};

pub struct ExpansionController<S> {
    source: S,
    map: Mutex<MindMap>,
}

impl<S: WordSource> ExpansionController<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self {
            source,
            map: Mutex::new(MindMap::new(config)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reset and grow a new tree from `word`, expanding the root right away.
    pub async fn start(&self, word: &str) -> Result<ExpansionOutcome> {
        let ticket = self.map.lock().await.start(word)?;
        self.run(ticket).await
    }

    /// Expand `id`. A node that is already loading or expanded yields `Skipped`.
    ///
    /// On a word source failure the node is collapsed again and the error is returned.
    pub async fn expand(&self, id: &NodeId) -> Result<ExpansionOutcome> {
        let ticket = self.map.lock().await.begin_expansion(id)?;
        let Some(ticket) = ticket else {
            return Ok(ExpansionOutcome::Skipped);
        };
        self.run(ticket).await
    }

    async fn run(&self, ticket: ExpansionTicket) -> Result<ExpansionOutcome> {
        debug!(node = %ticket.node_id, word = %ticket.word, "requesting related words");
        let result = self
            .source
            .generate_related(&ticket.word, &ticket.existing_words)
            .await;

        let mut map = self.map.lock().await;
        match result {
            Ok(words) => map.complete_expansion(&ticket, &words),
            Err(e) => match map.fail_expansion(&ticket, &e.to_string())? {
                ExpansionOutcome::Failed { .. } => Err(e),
                other => Ok(other),
            },
        }
    }

    pub async fn reset(&self) {
        self.map.lock().await.reset();
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.map.lock().await.snapshot()
    }

    pub async fn error(&self) -> Option<String> {
        self.map.lock().await.error().map(str::to_string)
    }

    pub async fn render(&self) -> MapOutput {
        self.map.lock().await.render()
    }
}
