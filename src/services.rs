/// Host Engine Capability Traits
///
/// The engine's bundle and scene subsystems are collaborators the loader
/// calls through these traits. The host implements them against its real
/// engine; tests implement them with scripted fakes. All diagnostics go
/// through the `log` facade, so the host's logging sink is the third
/// collaborator without needing a trait of its own.

use std::path::Path;

use crate::error::LoaderResult;

/// Completion status of an in-flight bundle load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPoll<B> {
    /// The load has not finished yet
    InProgress,
    /// The load finished; `None` means the engine produced no bundle
    Done(Option<B>),
}

/// Asynchronous bundle loading, scene enumeration and unloading
pub trait BundleService {
    /// Handle to an in-flight load, single-use
    type Pending;

    /// Handle to a loaded bundle
    type Bundle;

    /// Submit an asynchronous load of the bundle at `path`. Returns
    /// immediately with a pending handle; completion is observed via
    /// [`BundleService::poll`].
    fn submit_load(&mut self, path: &Path) -> LoaderResult<Self::Pending>;

    /// Check an in-flight load. Must be cheap and non-blocking; the
    /// workflow calls it at a bounded rate.
    fn poll(&mut self, pending: &mut Self::Pending) -> LoaderResult<LoadPoll<Self::Bundle>>;

    /// Ordered scene paths contained in a loaded bundle
    fn scene_paths(&mut self, bundle: &Self::Bundle) -> LoaderResult<Vec<String>>;

    /// Load all assets contained in the bundle, returning how many were
    /// loaded. Failures here are advisory; the workflow logs them and
    /// continues.
    fn preload_assets(&mut self, bundle: &Self::Bundle) -> LoaderResult<usize>;

    /// Release a loaded bundle. `keep_objects` keeps already-instantiated
    /// objects alive when true.
    fn unload(&mut self, bundle: Self::Bundle, keep_objects: bool) -> LoaderResult<()>;
}

/// Additive scene loading
pub trait SceneService {
    /// Request an additive load of the scene identified by name or full
    /// path. Fire-and-forget: `Ok` means the request was accepted, not
    /// that the scene finished loading.
    fn load_additive(&mut self, name_or_path: &str) -> LoaderResult<()>;
}
