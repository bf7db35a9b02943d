/// Bundle Load / Scene Selection Workflow
///
/// A small state machine driven by a periodic, non-blocking `tick` from the
/// host. A trigger locates a bundle on disk, submits an asynchronous load
/// to the bundle service, polls it at a bounded rate, then picks a scene
/// from the result and requests an additive load. At most one load is in
/// flight and at most one bundle is retained at any time; loading a new
/// bundle requests the previous one's unload before replacing it.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::LoaderConfig;
use crate::error::LoaderError;
use crate::locator::{locate_bundle, select_preferred, BundleFile};
use crate::services::{BundleService, LoadPoll, SceneService};

/// Workflow state. `tick` advances at most one transition per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No load in progress, ready for a trigger
    Idle,
    /// A bundle was located; the async load has not been submitted yet
    Loading,
    /// An async load is in flight and polled for completion
    AwaitingCompletion,
    /// The bundle finished loading and awaits scene selection
    Processing,
    /// A step failed; partial state is cleared on the next tick
    Failed,
}

/// An in-flight asynchronous bundle load. Single-use: cleared on every
/// exit from `AwaitingCompletion`.
struct PendingLoad<P> {
    handle: P,
    path: PathBuf,
    submitted_at: Instant,
    last_poll: Option<Instant>,
}

/// A completed load awaiting processing
struct ReadyBundle<B> {
    bundle: B,
    path: PathBuf,
}

/// The load workflow. One instance, cooperatively driven; see
/// [`WorkflowState`] for the transition discipline.
pub struct LoadWorkflow<B: BundleService, S: SceneService> {
    bundles: B,
    scenes: S,
    state: WorkflowState,

    bundles_dir: PathBuf,
    bundle_extension: String,
    preferred_bundle: String,
    preferred_scene: String,
    poll_interval: Duration,
    load_timeout: Option<Duration>,
    preload_assets: bool,

    selected: Option<BundleFile>,
    pending: Option<PendingLoad<B::Pending>>,
    ready: Option<ReadyBundle<B::Bundle>>,
    loaded: Option<B::Bundle>,
    failure: Option<LoaderError>,
    last_error: Option<LoaderError>,
}

impl<B: BundleService, S: SceneService> LoadWorkflow<B, S> {
    /// Create a workflow over the host's bundle and scene services
    pub fn new(config: &LoaderConfig, bundles: B, scenes: S) -> Self {
        Self {
            bundles,
            scenes,
            state: WorkflowState::Idle,
            bundles_dir: config.bundles_dir.clone(),
            bundle_extension: config.bundle_extension.clone(),
            preferred_bundle: config.preferred_bundle.clone(),
            preferred_scene: config.preferred_scene.clone(),
            poll_interval: config.poll_interval(),
            load_timeout: config.load_timeout(),
            preload_assets: config.preload_assets,
            selected: None,
            pending: None,
            ready: None,
            loaded: None,
            failure: None,
            last_error: None,
        }
    }

    /// Current state
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Whether a bundle is currently retained
    pub fn has_loaded_bundle(&self) -> bool {
        self.loaded.is_some()
    }

    /// The error that sent the workflow through `Failed` most recently
    pub fn last_error(&self) -> Option<&LoaderError> {
        self.last_error.as_ref()
    }

    /// Request a load. Only honored while idle; a trigger during a load
    /// in flight is ignored so the in-flight operation is never orphaned.
    /// Returns whether the trigger was accepted.
    pub fn trigger(&mut self) -> bool {
        if self.state != WorkflowState::Idle {
            log::debug!(
                "load trigger ignored, workflow busy ({:?})",
                self.state
            );
            return false;
        }

        match locate_bundle(
            &self.bundles_dir,
            &self.bundle_extension,
            &self.preferred_bundle,
        ) {
            Ok(bundle_file) => {
                log::info!("loading bundle from: {}", bundle_file.path.display());
                self.selected = Some(bundle_file);
                self.state = WorkflowState::Loading;
                true
            }
            Err(e) => {
                // Locator failures leave the workflow idle with no side effects
                log::warn!("{}", e);
                self.last_error = Some(e);
                false
            }
        }
    }

    /// Advance the workflow by at most one transition. Non-blocking;
    /// `now` is the host's current frame time.
    pub fn tick(&mut self, now: Instant) {
        match self.state {
            WorkflowState::Idle => {}
            WorkflowState::Loading => self.submit(now),
            WorkflowState::AwaitingCompletion => self.poll_pending(now),
            WorkflowState::Processing => self.process_ready(),
            WorkflowState::Failed => self.recover(),
        }
    }

    /// `Loading -> AwaitingCompletion`: submit the async load
    fn submit(&mut self, now: Instant) {
        let Some(selected) = self.selected.take() else {
            self.state = WorkflowState::Idle;
            return;
        };

        match self.bundles.submit_load(&selected.path) {
            Ok(handle) => {
                log::info!("async bundle load started, waiting for completion");
                self.pending = Some(PendingLoad {
                    handle,
                    path: selected.path,
                    submitted_at: now,
                    last_poll: None,
                });
                self.state = WorkflowState::AwaitingCompletion;
            }
            Err(e) => {
                self.fail(LoaderError::BundleSubmitFailed {
                    path: selected.path,
                    error: e.to_string(),
                });
            }
        }
    }

    /// `AwaitingCompletion`: check the deadline, then poll at a bounded
    /// rate independent of the tick rate
    fn poll_pending(&mut self, now: Instant) {
        let Some(submitted_at) = self.pending.as_ref().map(|p| p.submitted_at) else {
            self.state = WorkflowState::Idle;
            return;
        };

        if let Some(timeout) = self.load_timeout {
            let waited = now.saturating_duration_since(submitted_at);
            if waited >= timeout {
                if let Some(pending) = self.pending.take() {
                    self.fail(LoaderError::LoadTimedOut {
                        path: pending.path,
                        waited,
                    });
                }
                return;
            }
        }

        let poll_result = {
            let Some(pending) = self.pending.as_mut() else {
                return;
            };
            let due = pending
                .last_poll
                .map_or(true, |t| now.saturating_duration_since(t) >= self.poll_interval);
            if !due {
                return;
            }
            pending.last_poll = Some(now);
            self.bundles.poll(&mut pending.handle)
        };

        match poll_result {
            Ok(LoadPoll::InProgress) => {}
            Ok(LoadPoll::Done(result)) => {
                let Some(pending) = self.pending.take() else {
                    return;
                };
                match result {
                    Some(bundle) => {
                        log::info!("bundle finished loading: {}", pending.path.display());
                        self.ready = Some(ReadyBundle {
                            bundle,
                            path: pending.path,
                        });
                        self.state = WorkflowState::Processing;
                    }
                    None => {
                        self.fail(LoaderError::BundleLoadFailed { path: pending.path });
                    }
                }
            }
            Err(e) => {
                self.pending = None;
                self.fail(e);
            }
        }
    }

    /// `Processing -> Idle`: retain the bundle, pick a scene and request
    /// the additive load
    fn process_ready(&mut self) {
        let Some(ready) = self.ready.take() else {
            self.state = WorkflowState::Idle;
            return;
        };
        let ReadyBundle { bundle, path } = ready;

        // Release the previously retained bundle before storing the new
        // one. Release failure is logged, never aborts the load.
        if let Some(previous) = self.loaded.take() {
            match self.bundles.unload(previous, false) {
                Ok(()) => log::info!("unloaded previous bundle"),
                Err(e) => log::warn!("failed to unload previous bundle: {}", e),
            }
        }

        if self.preload_assets {
            match self.bundles.preload_assets(&bundle) {
                Ok(count) => log::info!("preloaded {} asset(s) from bundle", count),
                Err(e) => log::warn!("failed to preload assets: {}", e),
            }
        }

        let scene_paths = match self.bundles.scene_paths(&bundle) {
            Ok(paths) => paths,
            Err(e) => {
                self.discard(bundle);
                self.fail(e);
                return;
            }
        };

        if scene_paths.is_empty() {
            self.discard(bundle);
            self.fail(LoaderError::NoScenesFound {
                bundle: path.display().to_string(),
            });
            return;
        }

        self.loaded = Some(bundle);
        log::info!("found {} scene(s) in bundle", scene_paths.len());
        for scene_path in &scene_paths {
            log::info!("  - {} (path: {})", scene_name(scene_path), scene_path);
        }

        // Same tie-break rule as the locator, applied to scene names
        let Some(scene_path) = select_preferred(&scene_paths, &self.preferred_scene, |p| {
            scene_name(p)
        })
        .cloned() else {
            return;
        };
        let name = scene_name(&scene_path).to_string();

        if name.eq_ignore_ascii_case(&self.preferred_scene) {
            log::info!("loading scene: {}", name);
        } else {
            log::info!(
                "{} scene not found, using first scene: {}",
                self.preferred_scene,
                name
            );
        }

        self.request_scene_load(&name, &scene_path);

        // Fire-and-forget terminal step: idle regardless of whether the
        // scene request was accepted
        self.state = WorkflowState::Idle;
    }

    /// Request the additive scene load, by name first and by full path if
    /// the name is rejected
    fn request_scene_load(&mut self, name: &str, scene_path: &str) {
        match self.scenes.load_additive(name) {
            Ok(()) => {
                log::info!("additive scene load requested by name: {}", name);
            }
            Err(name_err) => {
                log::warn!(
                    "scene load by name failed ({}), retrying by path",
                    name_err
                );
                match self.scenes.load_additive(scene_path) {
                    Ok(()) => {
                        log::info!("additive scene load requested by path: {}", scene_path);
                    }
                    Err(path_err) => {
                        let err = LoaderError::SceneLoadRequestFailed {
                            scene: name.to_string(),
                            error: path_err.to_string(),
                        };
                        log::error!("{}", err);
                        self.last_error = Some(err);
                    }
                }
            }
        }
    }

    /// `Failed -> Idle`: log the diagnostic and drop any partial state
    fn recover(&mut self) {
        if let Some(err) = self.failure.take() {
            log::error!("bundle load failed: {}", err);
            self.last_error = Some(err);
        }
        self.selected = None;
        self.pending = None;
        self.ready = None;
        self.state = WorkflowState::Idle;
    }

    /// Enter `Failed` with the given error
    fn fail(&mut self, error: LoaderError) {
        self.failure = Some(error);
        self.state = WorkflowState::Failed;
    }

    /// Unload a bundle that will not be retained
    fn discard(&mut self, bundle: B::Bundle) {
        if let Err(e) = self.bundles.unload(bundle, false) {
            log::warn!("failed to unload rejected bundle: {}", e);
        }
    }
}

/// Scene name from a scene path: the file stem, mirroring how engines
/// report bundled scenes ("Assets/Scenes/stadium.unity" -> "stadium")
fn scene_name(scene_path: &str) -> &str {
    Path::new(scene_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(scene_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_name_extraction() {
        assert_eq!(scene_name("Assets/Scenes/stadium.unity"), "stadium");
        assert_eq!(scene_name("arena.unity"), "arena");
        assert_eq!(scene_name("menu"), "menu");
        assert_eq!(scene_name(""), "");
    }

    #[test]
    fn test_scene_selection_mirrors_locator_rule() {
        let paths = vec![
            "Assets/menu.unity".to_string(),
            "Assets/STADIUM.unity".to_string(),
        ];
        let picked = select_preferred(&paths, "stadium", |p| scene_name(p)).unwrap();
        assert_eq!(picked, "Assets/STADIUM.unity");

        let paths = vec!["Assets/menu.unity".to_string(), "Assets/arena.unity".to_string()];
        let picked = select_preferred(&paths, "stadium", |p| scene_name(p)).unwrap();
        assert_eq!(picked, "Assets/menu.unity");
    }
}
