//! Core runtime configuration.
//!
//! Resolved once at process startup and passed into `DashboardService`. Request handlers never
//! read the environment.

use crate::constants::DEFAULT_DATASET_PATH;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    dataset_path: PathBuf,
}

impl CoreConfig {
    pub fn new(dataset_path: PathBuf) -> Self {
        Self { dataset_path }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }
}

/// Resolve the dataset file without reading environment variables.
///
/// An explicit override is returned as given; a missing file there is reported when the
/// dataset is loaded. Otherwise this looks for `data/synthetic_ehr_data.csv` relative to the
/// current working directory and then walks up from `CARGO_MANIFEST_DIR`. When nothing is
/// found the working-directory path is returned and loading falls back to the sample set.
pub fn resolve_dataset_path(override_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.as_os_str().is_empty()) {
        return path;
    }

    let cwd_relative = PathBuf::from(DEFAULT_DATASET_PATH);
    if cwd_relative.is_file() {
        return cwd_relative;
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_DATASET_PATH);
        if candidate.is_file() {
            return candidate;
        }
    }

    cwd_relative
}
