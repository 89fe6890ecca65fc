//! On-disk trace bundles.

use crate::error::{TraceError, TraceResult};
use crate::model::TraceModel;
use std::path::{Path, PathBuf};

/// Manifest file name inside a bundle
pub const MANIFEST_FILE: &str = "trace.json";

/// Blob directory name inside a bundle
pub const RESOURCES_DIR: &str = "resources";

/// A loaded trace bundle
#[derive(Debug, Clone)]
pub struct TraceBundle {
    root: PathBuf,
    model: TraceModel,
}

impl TraceBundle {
    /// Open a bundle directory and parse its manifest
    ///
    /// # Errors
    ///
    /// Returns error if the manifest is missing, unreadable, or malformed
    pub fn open(root: impl AsRef<Path>) -> TraceResult<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest = root.join(MANIFEST_FILE);
        if !manifest.is_file() {
            return Err(TraceError::MissingManifest { path: manifest });
        }

        let json = std::fs::read_to_string(&manifest).map_err(|e| TraceError::Io {
            path: manifest.clone(),
            reason: e.to_string(),
        })?;
        let model = TraceModel::from_json(&json)?;

        tracing::debug!(
            root = %root.display(),
            pages = model.pages.len(),
            resources = model.resource_count(),
            "loaded trace bundle"
        );

        Ok(Self { root, model })
    }

    /// Write a model as a new bundle manifest
    ///
    /// # Errors
    ///
    /// Returns error if the directory or manifest can not be written
    pub fn create(root: impl AsRef<Path>, model: TraceModel) -> TraceResult<Self> {
        let root = root.as_ref().to_path_buf();
        let resources = root.join(RESOURCES_DIR);
        std::fs::create_dir_all(&resources).map_err(|e| TraceError::Io {
            path: resources,
            reason: e.to_string(),
        })?;

        let manifest = root.join(MANIFEST_FILE);
        std::fs::write(&manifest, model.to_json()?).map_err(|e| TraceError::Io {
            path: manifest,
            reason: e.to_string(),
        })?;

        Ok(Self { root, model })
    }

    /// Bundle root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one file per content hash
    #[must_use]
    pub fn resources_dir(&self) -> PathBuf {
        self.root.join(RESOURCES_DIR)
    }

    /// Loaded model
    #[must_use]
    pub fn model(&self) -> &TraceModel {
        &self.model
    }

    /// Take ownership of the model
    #[must_use]
    pub fn into_model(self) -> TraceModel {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageContext;
    use tracetime_core::PageId;

    #[test]
    fn test_open_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = TraceBundle::open(dir.path()).unwrap_err();
        assert!(matches!(err, TraceError::MissingManifest { .. }));
    }

    #[test]
    fn test_open_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();
        let err = TraceBundle::open(dir.path()).unwrap_err();
        assert!(matches!(err, TraceError::Parse { .. }));
    }

    #[test]
    fn test_create_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let model = TraceModel::new(vec![PageContext::new(PageId::new("page@1"))]);

        let created = TraceBundle::create(dir.path(), model.clone()).unwrap();
        assert!(created.resources_dir().is_dir());

        let opened = TraceBundle::open(dir.path()).unwrap();
        assert_eq!(opened.model(), &model);
        assert_eq!(opened.root(), dir.path());
    }
}
