//! Host panels the engine has attached to.

use graft_tree::{NodeId, UiTree};

/// One injected host panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Settings panel root.
    pub settings: NodeId,
    /// Content region under the panel.
    pub content: NodeId,
    /// Panel belongs to the in-game scene.
    pub in_game: bool,
}

impl Context {
    /// Returns true while both the panel and its content region are alive.
    #[must_use]
    pub fn is_alive(&self, tree: &UiTree) -> bool {
        tree.contains(self.settings) && tree.contains(self.content)
    }
}

/// Contexts in registration order, unique per `(settings, in_game)`.
#[derive(Debug, Default)]
pub struct ContextRegistry {
    contexts: Vec<Context>,
}

impl ContextRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            contexts: Vec::new(),
        }
    }

    /// Adds a context. Returns false if one for the same panel and scene
    /// kind already exists.
    pub fn register(&mut self, context: Context) -> bool {
        let known = self
            .contexts
            .iter()
            .any(|c| c.settings == context.settings && c.in_game == context.in_game);
        if known {
            return false;
        }
        self.contexts.push(context);
        true
    }

    /// Drops dead contexts and returns the rest, newest first.
    pub fn live_rev(&mut self, tree: &UiTree) -> Vec<Context> {
        let before = self.contexts.len();
        self.contexts.retain(|context| context.is_alive(tree));
        let pruned = before - self.contexts.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped dead settings contexts");
        }
        self.contexts.iter().rev().copied().collect()
    }

    /// Number of contexts, dead ones included until the next prune.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Returns true if nothing was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Forgets every context.
    pub fn clear(&mut self) {
        self.contexts.clear();
    }
}
