//! # Runtime
//!
//! Per-frame driver between the host and [`NativeSettings`].
//!
//! ```text
//! Frame N:
//! ┌──────────────────────────────────────────────────────────┐
//! │ 1. ATTACH                                                │
//! │    ├─ Poll every pending attempt once                    │
//! │    ├─ Inject panels whose controller appeared            │
//! │    └─ Drop attempts that ran out of polls                │
//! │                                                          │
//! │ 2. LANGUAGE (every `language_poll_interval + 1` frames)  │
//! │    └─ Broadcast a changed host language                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A scene load starts one attempt per controller kind and polls it on
//! the spot; a scene unload cancels that scene's attempts.

use graft_engine::{GraftError, InjectOutcome, NativeSettings};
use graft_shared::Language;
use graft_tree::{ControllerKind, NodeId};

use crate::attach::{AttachAttempt, AttachPoll, SceneId};
use crate::probe::{HostProbe, TreeProbe};

/// One panel injected during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Injection {
    /// Scene the attempt belonged to.
    pub scene: SceneId,
    /// Controller kind.
    pub kind: ControllerKind,
    /// Settings panel injected.
    pub settings: NodeId,
    /// What the registry did.
    pub outcome: InjectOutcome,
}

/// What happened during one frame.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Panels injected.
    pub injected: Vec<Injection>,
    /// Attempts that gave up.
    pub abandoned: usize,
    /// New language, if it changed.
    pub language: Option<Language>,
    /// Injections that failed to bind a control.
    pub failures: Vec<GraftError>,
}

impl TickReport {
    /// Returns true if nothing happened.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.injected.is_empty()
            && self.abandoned == 0
            && self.language.is_none()
            && self.failures.is_empty()
    }

    fn merge(&mut self, other: Self) {
        self.injected.extend(other.injected);
        self.abandoned += other.abandoned;
        self.language = other.language.or(self.language);
        self.failures.extend(other.failures);
    }
}

/// Lifetime counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Frames ticked.
    pub frames: u64,
    /// Scene loads seen.
    pub scenes_loaded: u64,
    /// Attempts that found their controller.
    pub attached: u64,
    /// Attempts that gave up.
    pub abandoned: u64,
    /// Attempts cancelled by a scene unload.
    pub cancelled: u64,
    /// Language changes broadcast.
    pub language_changes: u64,
}

/// Drives attach and language polling.
pub struct Runtime<P: HostProbe = TreeProbe> {
    settings: NativeSettings,
    probe: P,
    attempts: Vec<AttachAttempt>,
    language_countdown: u32,
    last_language: Language,
    stats: RuntimeStats,
}

impl Runtime<TreeProbe> {
    /// Creates a runtime that reads the host components of the tree.
    #[must_use]
    pub fn with_tree_probe(settings: NativeSettings) -> Self {
        Self::new(settings, TreeProbe)
    }
}

impl<P: HostProbe> Runtime<P> {
    /// Creates a runtime and syncs the registry with the host language.
    #[must_use]
    pub fn new(settings: NativeSettings, probe: P) -> Self {
        let mut runtime = Self {
            settings,
            probe,
            attempts: Vec::new(),
            language_countdown: 0,
            last_language: Language::default(),
            stats: RuntimeStats::default(),
        };
        let language = runtime.host_language();
        runtime.last_language = language;
        if language != runtime.settings.language() {
            runtime.settings.notify_language_changed(language);
        }
        runtime
    }

    /// The registry being driven.
    #[must_use]
    pub const fn settings(&self) -> &NativeSettings {
        &self.settings
    }

    /// The host probe.
    #[must_use]
    pub const fn probe(&self) -> &P {
        &self.probe
    }

    /// Attempts still polling.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.attempts.len()
    }

    /// Lifetime counters.
    #[must_use]
    pub const fn stats(&self) -> RuntimeStats {
        self.stats
    }

    /// Starts a menu and an in-game attempt for `scene` and polls both
    /// once. Attempts already pending for the scene start over.
    pub fn on_scene_loaded(&mut self, scene: SceneId) -> TickReport {
        self.stats.scenes_loaded += 1;
        self.attempts.retain(|attempt| attempt.scene() != scene);

        let max_attempts = self.settings.config().attach.max_attempts;
        for kind in [ControllerKind::Menu, ControllerKind::Game] {
            self.attempts.push(AttachAttempt::new(scene, kind, max_attempts));
        }
        tracing::debug!(%scene, "Scene loaded; waiting for controllers");

        let mut report = TickReport::default();
        self.poll_attempts(&mut report, Some(scene));
        report
    }

    /// Cancels the pending attempts of `scene`. Returns how many were
    /// cancelled.
    pub fn on_scene_unloaded(&mut self, scene: SceneId) -> usize {
        let before = self.attempts.len();
        self.attempts.retain(|attempt| attempt.scene() != scene);
        let cancelled = before - self.attempts.len();
        self.stats.cancelled += cancelled as u64;
        if cancelled > 0 {
            tracing::debug!(%scene, cancelled, "Scene unloaded; attach cancelled");
        }
        cancelled
    }

    /// Runs one frame.
    pub fn tick(&mut self) -> TickReport {
        self.stats.frames += 1;
        let mut report = TickReport::default();
        self.poll_attempts(&mut report, None);
        self.poll_language(&mut report);
        report
    }

    /// Runs `frames` frames and merges their reports.
    pub fn run(&mut self, frames: u32) -> TickReport {
        let mut report = TickReport::default();
        for _ in 0..frames {
            report.merge(self.tick());
        }
        report
    }

    fn host_language(&self) -> Language {
        let tree = self.settings.tree().lock();
        self.probe
            .current_language(&tree)
            .unwrap_or(self.settings.config().fallback_language)
    }

    /// Polls pending attempts, optionally only those of `only`.
    fn poll_attempts(&mut self, report: &mut TickReport, only: Option<SceneId>) {
        let mut ready = Vec::new();
        {
            let tree = self.settings.tree().lock();
            let probe = &self.probe;
            self.attempts.retain_mut(|attempt| {
                if only.is_some_and(|scene| scene != attempt.scene()) {
                    return true;
                }
                match attempt.poll(&tree, probe) {
                    AttachPoll::Pending => true,
                    AttachPoll::Attached { settings, .. } => {
                        ready.push((attempt.scene(), attempt.kind(), settings));
                        false
                    }
                    AttachPoll::Abandoned => {
                        report.abandoned += 1;
                        false
                    }
                }
            });
        }
        self.stats.abandoned += report.abandoned as u64;

        for (scene, kind, settings) in ready {
            self.stats.attached += 1;
            let Some(settings) = settings else {
                tracing::debug!(%scene, ?kind, "Controller has no settings panel");
                continue;
            };
            let in_game = matches!(kind, ControllerKind::Game);
            match self.settings.inject(settings, in_game) {
                Ok(outcome) => report.injected.push(Injection {
                    scene,
                    kind,
                    settings,
                    outcome,
                }),
                Err(err) => report.failures.push(err),
            }
        }
    }

    fn poll_language(&mut self, report: &mut TickReport) {
        if self.language_countdown > 0 {
            self.language_countdown -= 1;
            return;
        }
        self.language_countdown = self.settings.config().attach.language_poll_interval;

        let language = self.host_language();
        if language != self.last_language {
            self.last_language = language;
            self.settings.notify_language_changed(language);
            self.stats.language_changes += 1;
            report.language = Some(language);
        }
    }
}

impl<P: HostProbe> std::fmt::Debug for Runtime<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("pending", &self.attempts.len())
            .field("last_language", &self.last_language)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_engine::EngineConfig;
    use graft_prefs::{shared, MemoryStore};
    use graft_tree::{FixtureOptions, HostFixture, LocalisationManager, UiTree};

    fn runtime(options: &FixtureOptions, config: EngineConfig) -> (Runtime, HostFixture) {
        let mut tree = UiTree::new();
        let host = HostFixture::build(&mut tree, options);
        let settings = NativeSettings::init(
            tree.into_shared(),
            shared(MemoryStore::new()),
            config,
            Language::English,
        );
        (Runtime::with_tree_probe(settings), host)
    }

    #[test]
    fn test_scene_load_injects_present_controller() {
        let (mut runtime, host) = runtime(&FixtureOptions::default(), EngineConfig::default());
        let report = runtime.on_scene_loaded(SceneId(1));

        assert_eq!(report.injected.len(), 1);
        assert_eq!(report.injected[0].settings, host.settings);
        assert_eq!(report.injected[0].kind, ControllerKind::Menu);
        assert_eq!(runtime.pending(), 1);
        assert_eq!(runtime.settings().context_count(), 1);
    }

    #[test]
    fn test_reload_restarts_attempts() {
        let options = FixtureOptions {
            controller: None,
            ..FixtureOptions::default()
        };
        let (mut runtime, _) = runtime(&options, EngineConfig::default());
        runtime.on_scene_loaded(SceneId(1));
        runtime.on_scene_loaded(SceneId(1));

        assert_eq!(runtime.pending(), 2);
        assert_eq!(runtime.stats().scenes_loaded, 2);
    }

    #[test]
    fn test_unload_cancels() {
        let options = FixtureOptions {
            controller: None,
            ..FixtureOptions::default()
        };
        let (mut runtime, _) = runtime(&options, EngineConfig::default());
        runtime.on_scene_loaded(SceneId(1));
        runtime.on_scene_loaded(SceneId(2));

        assert_eq!(runtime.on_scene_unloaded(SceneId(1)), 2);
        assert_eq!(runtime.pending(), 2);
        assert_eq!(runtime.stats().cancelled, 2);
    }

    #[test]
    fn test_language_poll_interval() {
        let (mut runtime, host) = runtime(&FixtureOptions::default(), EngineConfig::default());
        assert!(runtime.tick().language.is_none());

        runtime
            .settings()
            .tree()
            .lock()
            .get_mut::<LocalisationManager>(host.root)
            .unwrap()
            .current = Some(Language::ChineseSimplified);

        // Checked on the first frame, then every 11th.
        for _ in 0..10 {
            assert!(runtime.tick().language.is_none());
        }
        assert_eq!(runtime.tick().language, Some(Language::ChineseSimplified));
        assert_eq!(runtime.settings().language(), Language::ChineseSimplified);
        assert_eq!(runtime.stats().language_changes, 1);
    }

    #[test]
    fn test_initial_language_synced() {
        let options = FixtureOptions {
            language: Some(Language::Korean),
            ..FixtureOptions::default()
        };
        let (runtime, _) = runtime(&options, EngineConfig::default());
        assert_eq!(runtime.settings().language(), Language::Korean);
    }
}
