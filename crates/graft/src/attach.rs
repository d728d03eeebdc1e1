//! # Attach Attempts
//!
//! The host creates its controllers some frames after a scene loads. An
//! attempt polls for one controller kind once per frame and gives up after
//! a fixed number of polls.
//!
//! ```text
//! scene load ──> poll ──> poll ──> ... ──> Attached { settings }
//!                  │                  └──> Abandoned (after max polls)
//!                  └── Pending
//! ```

use std::fmt;

use graft_tree::{ControllerKind, NodeId, UiTree};

use crate::probe::HostProbe;

/// Identifies a loaded host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u32);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scene({})", self.0)
    }
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachPoll {
    /// Controller not there yet.
    Pending,
    /// Controller found. `settings` is `None` if it owns no panel.
    Attached {
        /// The controller node.
        controller: NodeId,
        /// Its settings panel.
        settings: Option<NodeId>,
    },
    /// No controller after the maximum number of polls.
    Abandoned,
}

/// Polls for one controller kind in one scene.
#[derive(Debug, Clone)]
pub struct AttachAttempt {
    scene: SceneId,
    kind: ControllerKind,
    polls: u32,
    max_attempts: u32,
}

impl AttachAttempt {
    /// Starts an attempt that abandons after `max_attempts` failed polls.
    #[must_use]
    pub const fn new(scene: SceneId, kind: ControllerKind, max_attempts: u32) -> Self {
        Self {
            scene,
            kind,
            polls: 0,
            max_attempts,
        }
    }

    /// Scene the attempt belongs to.
    #[must_use]
    pub const fn scene(&self) -> SceneId {
        self.scene
    }

    /// Controller kind polled for.
    #[must_use]
    pub const fn kind(&self) -> ControllerKind {
        self.kind
    }

    /// Returns true for in-game attempts.
    #[must_use]
    pub const fn in_game(&self) -> bool {
        matches!(self.kind, ControllerKind::Game)
    }

    /// Failed polls so far.
    #[must_use]
    pub const fn polls(&self) -> u32 {
        self.polls
    }

    /// Looks for the controller once.
    pub fn poll<P: HostProbe + ?Sized>(&mut self, tree: &UiTree, probe: &P) -> AttachPoll {
        if let Some(controller) = probe.find_controller(tree, self.kind) {
            return AttachPoll::Attached {
                controller,
                settings: probe.settings_for(tree, controller),
            };
        }

        self.polls = self.polls.saturating_add(1);
        if self.polls >= self.max_attempts {
            tracing::debug!(
                scene = %self.scene,
                kind = ?self.kind,
                polls = self.polls,
                "Controller never appeared; attach abandoned"
            );
            AttachPoll::Abandoned
        } else {
            AttachPoll::Pending
        }
    }
}
