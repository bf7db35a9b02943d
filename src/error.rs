//! Loader error handling
//!
//! Every failure in the load workflow maps to one of these variants. All of
//! them are recoverable: the workflow logs the error, resets to idle and
//! waits for the next trigger. Nothing here is fatal to the host.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Type alias for loader operation results
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors produced by the locator, the load workflow and the host services
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The configured bundles directory does not exist
    #[error("bundles directory not found: {path}")]
    DirectoryMissing { path: PathBuf },

    /// The bundles directory exists but holds no matching files
    #[error("no .{extension} files found in: {path}")]
    NoBundlesFound { path: PathBuf, extension: String },

    /// The bundles directory could not be enumerated
    #[error("failed to scan bundles directory {path}: {error}")]
    ScanFailed { path: PathBuf, error: String },

    /// Submitting the asynchronous load to the bundle service failed
    #[error("failed to submit bundle load for {path}: {error}")]
    BundleSubmitFailed { path: PathBuf, error: String },

    /// The asynchronous load completed but produced no bundle
    #[error("bundle load completed without a bundle: {path}")]
    BundleLoadFailed { path: PathBuf },

    /// The asynchronous load did not complete within the configured budget
    #[error("bundle load timed out after {waited:?}: {path}")]
    LoadTimedOut { path: PathBuf, waited: Duration },

    /// The loaded bundle contains no scenes
    #[error("no scenes found in bundle: {bundle}")]
    NoScenesFound { bundle: String },

    /// The engine rejected the additive scene load request
    #[error("scene load request failed for '{scene}': {error}")]
    SceneLoadRequestFailed { scene: String, error: String },

    /// A host service call failed
    #[error("{context}: {error}")]
    ServiceError { context: String, error: String },

    /// Configuration file could not be read
    #[error("failed to read config {path}: {error}")]
    ConfigIo { path: PathBuf, error: String },

    /// Configuration file could not be parsed
    #[error("failed to parse config {path}: {error}")]
    ConfigParse { path: PathBuf, error: String },

    /// Configuration values failed validation
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Create a service error with call-site context
pub fn service_error(context: impl Into<String>, error: impl std::fmt::Display) -> LoaderError {
    LoaderError::ServiceError {
        context: context.into(),
        error: error.to_string(),
    }
}
