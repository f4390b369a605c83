//! Staging-directory layout and the reduced-manifest write.
//!
//! The staging directory is disposable until a run reaches `Done`: a failed
//! run leaves whatever it had written in place and nothing is rolled back.
use crate::config::LayerConfig;
use crate::error::LayerError;
use crate::manifest::{write_manifest, DependencyMap, Manifest};
use std::fs;
use std::path::{Path, PathBuf};

/// Typed paths into a workspace and its staging directory.
#[derive(Debug, Clone)]
pub struct StagingPaths {
    workspace_root: PathBuf,
    build_dir: String,
    runtime_dir: String,
    manifest_name: String,
    lockfile_name: String,
    modules_dir: String,
}

impl StagingPaths {
    pub fn new(config: &LayerConfig) -> Self {
        Self {
            workspace_root: config.workspace_root.clone(),
            build_dir: config.build_dir.clone(),
            runtime_dir: config.runtime_dir.clone(),
            manifest_name: config.manifest_name.clone(),
            lockfile_name: config.lockfile_name.clone(),
            modules_dir: config.modules_dir.clone(),
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Return the workspace's own `package.json` path.
    pub fn source_manifest_path(&self) -> PathBuf {
        self.workspace_root.join(&self.manifest_name)
    }

    /// Return the workspace `node_modules/` directory.
    pub fn workspace_modules_dir(&self) -> PathBuf {
        self.workspace_root.join(&self.modules_dir)
    }

    /// Return `<build>/<runtime>`, the directory the installer runs in.
    pub fn staging_dir(&self) -> PathBuf {
        self.workspace_root
            .join(&self.build_dir)
            .join(&self.runtime_dir)
    }

    /// Return the staged `node_modules/` directory.
    pub fn staging_modules_dir(&self) -> PathBuf {
        self.staging_dir().join(&self.modules_dir)
    }

    /// Return the reduced manifest path inside the staging directory.
    pub fn staged_manifest_path(&self) -> PathBuf {
        self.staging_dir().join(&self.manifest_name)
    }

    /// Return the installer's lockfile path inside the staging directory.
    pub fn staged_lockfile_path(&self) -> PathBuf {
        self.staging_dir().join(&self.lockfile_name)
    }

    pub fn manifest_name(&self) -> &str {
        &self.manifest_name
    }

    /// Name of each internal dependency's prebuilt-output directory.
    pub fn prebuilt_dir_name(&self) -> &str {
        &self.build_dir
    }
}

/// Write the reduced manifest (source fields, external dependencies only).
///
/// Creates the staging directory if it does not exist yet.
pub fn write_reduced_manifest(
    paths: &StagingPaths,
    source: &Manifest,
    external: &DependencyMap,
) -> Result<PathBuf, LayerError> {
    let reduced = source.with_dependencies(external.clone());
    let path = paths.staged_manifest_path();
    write_manifest(&path, &reduced)?;
    tracing::info!(
        path = %path.display(),
        dependencies = external.len(),
        "reduced manifest staged"
    );
    Ok(path)
}

/// Remove a previous run's staging directory.
pub fn clear_staging(paths: &StagingPaths) -> Result<(), LayerError> {
    let dir = paths.staging_dir();
    match fs::remove_dir_all(&dir) {
        Ok(()) => {
            tracing::info!(path = %dir.display(), "removed previous staging directory");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(LayerError::Cleanup { path: dir, source }),
    }
}

/// Remove a file, treating an already-absent file as success.
pub fn remove_if_present(path: &Path) -> Result<bool, LayerError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(LayerError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}
