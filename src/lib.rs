//! Scene Bundle Loader
//!
//! Loads scene bundles from disk into a running game. On an edge-triggered
//! hotkey the loader scans a configured directory for `.bundle` files,
//! submits an asynchronous load through the host engine's bundle service,
//! polls it at a bounded rate from the host's per-frame `update`, then
//! picks a scene out of the loaded bundle and requests an additive scene
//! load. The engine's bundle and scene subsystems are capability traits
//! ([`BundleService`], [`SceneService`]) the host implements; diagnostics
//! go through the `log` facade.

pub mod config;
pub mod error;
pub mod input;
pub mod locator;
pub mod runtime;
pub mod services;
pub mod workflow;

pub use config::LoaderConfig;
pub use error::{LoaderError, LoaderResult};
pub use input::HotkeyTrigger;
pub use locator::{locate_bundle, BundleFile};
pub use runtime::SceneLoaderRuntime;
pub use services::{BundleService, LoadPoll, SceneService};
pub use workflow::{LoadWorkflow, WorkflowState};
