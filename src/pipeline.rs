//! Layer build orchestration.
//!
//! Steps run strictly in order and the first failure aborts the run. The
//! staging directory is left as-is on failure; callers must treat it as
//! disposable until `build_layer` returns `Ok`.
use crate::config::LayerConfig;
use crate::deps::split_dependencies;
use crate::error::LayerError;
use crate::external::install_external;
use crate::internal::{install_internal, CopyLayout};
use crate::manifest::read_manifest;
use crate::staging::{clear_staging, remove_if_present, write_reduced_manifest, StagingPaths};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Pipeline states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Configure,
    ReadManifest,
    Classify,
    WriteReducedManifest,
    InstallExternal,
    InstallInternal,
    Cleanup,
    Done,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::Configure => "configure",
            Step::ReadManifest => "read manifest",
            Step::Classify => "classify dependencies",
            Step::WriteReducedManifest => "write reduced manifest",
            Step::InstallExternal => "install external dependencies",
            Step::InstallInternal => "install internal dependencies",
            Step::Cleanup => "cleanup",
            Step::Done => "done",
        };
        f.write_str(label)
    }
}

/// Summary of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct LayerReport {
    pub staging_dir: PathBuf,
    pub external: Vec<String>,
    pub internal: Vec<String>,
    /// Files copied across all internal dependencies.
    pub internal_files: usize,
}

/// Build the runtime layer described by `config`.
pub fn build_layer(config: &LayerConfig) -> Result<LayerReport, LayerError> {
    config.validate()?;
    let paths = StagingPaths::new(config);
    if config.clean {
        clear_staging(&paths)?;
    }

    tracing::debug!(step = %Step::ReadManifest);
    let manifest = read_manifest(&paths.source_manifest_path())?;

    tracing::debug!(step = %Step::Classify);
    let groups = split_dependencies(&manifest.dependencies, &config.internal_scope);
    tracing::info!(
        internal = groups.internal.len(),
        external = groups.external.len(),
        scope = %config.internal_scope,
        "dependencies classified"
    );

    tracing::debug!(step = %Step::WriteReducedManifest);
    write_reduced_manifest(&paths, &manifest, &groups.external)?;

    tracing::debug!(step = %Step::InstallExternal);
    let staging_dir = paths.staging_dir();
    install_external(&config.installer, &staging_dir)?;

    tracing::debug!(step = %Step::InstallInternal);
    let source_modules_dir = paths.workspace_modules_dir();
    let target_modules_dir = paths.staging_modules_dir();
    let layout = CopyLayout {
        source_modules_dir: &source_modules_dir,
        target_modules_dir: &target_modules_dir,
        manifest_name: paths.manifest_name(),
        prebuilt_dir_name: paths.prebuilt_dir_name(),
    };
    let copied = install_internal(&groups.internal, &layout)?;

    tracing::debug!(step = %Step::Cleanup);
    cleanup(&paths)?;

    tracing::info!(step = %Step::Done, staging_dir = %staging_dir.display(), "layer built");
    Ok(LayerReport {
        staging_dir,
        external: groups.external.into_keys().collect(),
        internal: groups.internal.into_keys().collect(),
        internal_files: copied.iter().map(|dep| dep.files).sum(),
    })
}

/// Delete the reduced manifest and the installer's lockfile. Safe to repeat.
pub fn cleanup(paths: &StagingPaths) -> Result<(), LayerError> {
    for path in [paths.staged_manifest_path(), paths.staged_lockfile_path()] {
        if remove_if_present(&path)? {
            tracing::debug!(path = %path.display(), "removed");
        }
    }
    Ok(())
}
