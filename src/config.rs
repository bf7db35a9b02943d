use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Deserialize;

use crate::error::{LoaderError, LoaderResult};

/// Loader configuration
///
/// Defaults mirror the conventional layout: a `bundles` directory scanned
/// for `.bundle` files, with `stadium.bundle` / `stadium` as the preferred
/// bundle and scene names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory scanned for bundle files
    pub bundles_dir: PathBuf,

    /// File extension that marks a bundle (without the leading dot)
    pub bundle_extension: String,

    /// Bundle filename loaded in preference to any other
    pub preferred_bundle: String,

    /// Scene name loaded in preference to any other
    pub preferred_scene: String,

    /// Minimum interval between completion polls, in milliseconds
    pub poll_interval_ms: u64,

    /// Minimum interval between hotkey samples, in milliseconds
    pub hotkey_check_interval_ms: u64,

    /// Maximum wait for an asynchronous load, in seconds. Zero disables
    /// the deadline and the workflow polls until the engine answers.
    pub load_timeout_secs: u64,

    /// Preload all assets from the bundle before requesting the scene
    pub preload_assets: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            bundles_dir: PathBuf::from("bundles"),
            bundle_extension: "bundle".to_string(),
            preferred_bundle: "stadium.bundle".to_string(),
            preferred_scene: "stadium".to_string(),
            poll_interval_ms: 100,
            hotkey_check_interval_ms: 100,
            load_timeout_secs: 30,
            preload_assets: true,
        }
    }
}

impl LoaderConfig {
    /// Parse configuration from a TOML string. Missing fields fall back
    /// to their defaults.
    pub fn from_toml_str(content: &str) -> LoaderResult<Self> {
        let config: LoaderConfig =
            toml::from_str(content).map_err(|e| LoaderError::ConfigParse {
                path: PathBuf::from("<string>"),
                error: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> LoaderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LoaderError::ConfigIo {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        let config: LoaderConfig =
            toml::from_str(&content).map_err(|e| LoaderError::ConfigParse {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> LoaderResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(LoaderError::InvalidConfig {
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        if self.hotkey_check_interval_ms == 0 {
            return Err(LoaderError::InvalidConfig {
                message: "hotkey_check_interval_ms must be greater than zero".to_string(),
            });
        }
        if self.bundle_extension.is_empty() || self.bundle_extension.starts_with('.') {
            return Err(LoaderError::InvalidConfig {
                message: "bundle_extension must be non-empty and carry no leading dot"
                    .to_string(),
            });
        }
        if self.preferred_bundle.is_empty() {
            return Err(LoaderError::InvalidConfig {
                message: "preferred_bundle must not be empty".to_string(),
            });
        }
        if self.preferred_scene.is_empty() {
            return Err(LoaderError::InvalidConfig {
                message: "preferred_scene must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Completion poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Hotkey sample interval
    pub fn hotkey_check_interval(&self) -> Duration {
        Duration::from_millis(self.hotkey_check_interval_ms)
    }

    /// Load deadline, `None` when disabled
    pub fn load_timeout(&self) -> Option<Duration> {
        if self.load_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.load_timeout_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.bundles_dir, PathBuf::from("bundles"));
        assert_eq!(config.bundle_extension, "bundle");
        assert_eq!(config.preferred_bundle, "stadium.bundle");
        assert_eq!(config.preferred_scene, "stadium");
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.load_timeout(), Some(Duration::from_secs(30)));
        assert!(config.preload_assets);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = LoaderConfig::from_toml_str(
            r#"
            bundles_dir = "mods/bundles"
            preferred_bundle = "arena.bundle"
            "#,
        )
        .unwrap();
        assert_eq!(config.bundles_dir, PathBuf::from("mods/bundles"));
        assert_eq!(config.preferred_bundle, "arena.bundle");
        // Untouched fields keep their defaults
        assert_eq!(config.preferred_scene, "stadium");
        assert_eq!(config.poll_interval_ms, 100);
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let config = LoaderConfig::from_toml_str("load_timeout_secs = 0").unwrap();
        assert_eq!(config.load_timeout(), None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(LoaderConfig::from_toml_str("poll_interval_ms = 0").is_err());
        assert!(LoaderConfig::from_toml_str("hotkey_check_interval_ms = 0").is_err());
        assert!(LoaderConfig::from_toml_str(r#"bundle_extension = ".bundle""#).is_err());
        assert!(LoaderConfig::from_toml_str(r#"preferred_scene = """#).is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = LoaderConfig::from_toml_str("bundles_dir = [").unwrap_err();
        assert!(matches!(err, LoaderError::ConfigParse { .. }));
    }
}
