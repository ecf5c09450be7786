//! Input discovery and project configuration.
//!
//! Finds the images to process from a file or directory path, and loads the
//! optional `pixsprite.yaml` manifest that supplies per-project defaults.
//!
//! # Example
//!
//! ```ignore
//! use pixsprite::discovery::{scan, DiscoveryConfig};
//!
//! let result = scan(Path::new("textures/"), &DiscoveryConfig::default())?;
//! println!("Found {} images", result.files.len());
//! ```

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use manifest::Manifest;
pub use scanner::{scan, DiscoveryConfig, ScanResult, SortOrder, DEFAULT_EXTENSIONS};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "pixsprite.yaml";

/// Load the manifest to use for a run.
///
/// An explicit path must exist. Otherwise `pixsprite.yaml` in `dir` is used
/// when present, and defaults when not.
pub fn load_manifest(explicit: Option<&Path>, dir: &Path) -> Result<(Manifest, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((Manifest::load(path)?, Some(path.to_path_buf())));
    }

    let candidate = dir.join(MANIFEST_FILENAME);
    if candidate.is_file() {
        let manifest = Manifest::load(&candidate)?;
        return Ok((manifest, Some(candidate)));
    }

    Ok((Manifest::default(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_manifest_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let (manifest, path) = load_manifest(None, dir.path()).unwrap();

        assert_eq!(manifest, Manifest::default());
        assert!(path.is_none());
    }

    #[test]
    fn test_load_manifest_from_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "pixel_size: 4\n").unwrap();

        let (manifest, path) = load_manifest(None, dir.path()).unwrap();

        assert_eq!(manifest.pixel_size, 4);
        assert_eq!(path, Some(dir.path().join(MANIFEST_FILENAME)));
    }

    #[test]
    fn test_load_manifest_explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("other.yaml");

        assert!(load_manifest(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_load_manifest_explicit_path_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "pixel_size: 4\n").unwrap();
        let explicit = dir.path().join("custom.yaml");
        fs::write(&explicit, "pixel_size: 32\n").unwrap();

        let (manifest, _) = load_manifest(Some(&explicit), dir.path()).unwrap();
        assert_eq!(manifest.pixel_size, 32);
    }
}
