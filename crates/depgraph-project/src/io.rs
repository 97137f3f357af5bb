use std::fs;
use std::path::{Path, PathBuf};

use crate::package_json::PackageJson;
use depgraph_error::{DepgraphError, Result};

/// Accepts either a project directory or a direct path to a manifest file.
#[must_use]
pub fn resolve_manifest_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join("package.json")
    } else {
        path.to_path_buf()
    }
}

pub fn read_package_json(path: &Path) -> Result<PackageJson> {
    let path = resolve_manifest_path(path);
    let content = fs::read_to_string(&path)
        .map_err(|e| DepgraphError::IoError(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| DepgraphError::ManifestError(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_from_directory_and_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = temp_dir.path().join("package.json");
        fs::write(&manifest, r#"{ "name": "demo", "dependencies": { "react": "^19.2.0" } }"#)
            .unwrap();

        let from_dir = read_package_json(temp_dir.path()).unwrap();
        let from_file = read_package_json(&manifest).unwrap();
        assert_eq!(from_dir, from_file);
        assert_eq!(from_dir.name.as_deref(), Some("demo"));
    }

    #[test]
    fn test_invalid_json_is_a_manifest_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("package.json"), "{ not json").unwrap();

        let err = read_package_json(temp_dir.path()).unwrap_err();
        assert!(matches!(err, DepgraphError::ManifestError(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = read_package_json(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DepgraphError::IoError(_)));
    }
}
