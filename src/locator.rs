use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LoaderError, LoaderResult};

/// A candidate bundle file discovered on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    /// Full path to the bundle
    pub path: PathBuf,

    /// Filename component, used for preferred-name matching
    pub file_name: String,
}

/// Select the entry whose name matches `preferred` (case-insensitive exact
/// match), falling back to the first entry. Returns `None` only for an
/// empty slice. The same rule drives bundle selection and scene selection.
pub(crate) fn select_preferred<'a, T, F>(items: &'a [T], preferred: &str, name_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    items
        .iter()
        .find(|item| name_of(item).eq_ignore_ascii_case(preferred))
        .or_else(|| items.first())
}

/// Locate the bundle to load in `dir`.
///
/// Scans for files carrying `extension` (matched case-insensitively,
/// without the leading dot) and applies the preferred-name rule. Directory
/// enumeration order is whatever the filesystem yields, so the fallback
/// pick is not guaranteed stable across runs.
pub fn locate_bundle(dir: &Path, extension: &str, preferred: &str) -> LoaderResult<BundleFile> {
    if !dir.is_dir() {
        return Err(LoaderError::DirectoryMissing {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| LoaderError::ScanFailed {
        path: dir.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if !matches {
            continue;
        }
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            candidates.push(BundleFile {
                file_name: file_name.to_string(),
                path,
            });
        }
    }

    match select_preferred(&candidates, preferred, |b| b.file_name.as_str()) {
        Some(selected) => {
            if selected.file_name.eq_ignore_ascii_case(preferred) {
                if candidates.len() > 1 {
                    log::info!(
                        "found {} bundle files, loading preferred: {}",
                        candidates.len(),
                        selected.file_name
                    );
                }
            } else {
                log::info!(
                    "{} not found, loading: {}",
                    preferred,
                    selected.file_name
                );
            }
            Ok(selected.clone())
        }
        None => Err(LoaderError::NoBundlesFound {
            path: dir.to_path_buf(),
            extension: extension.to_string(),
        }),
    }
}
