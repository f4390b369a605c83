//! Workspace dependency copy.
//!
//! Internal packages are already built, so only their manifest and prebuilt
//! output are projected into the staging tree. Their own `node_modules/`,
//! sources and configs stay behind. Symlinks are dereferenced: workspace
//! packages usually resolve through links into the monorepo.
use crate::error::LayerError;
use crate::manifest::DependencyMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Where to read resolved packages from and how they are laid out.
#[derive(Debug, Clone, Copy)]
pub struct CopyLayout<'a> {
    /// Workspace `node_modules/`.
    pub source_modules_dir: &'a Path,
    /// Staged `node_modules/`.
    pub target_modules_dir: &'a Path,
    pub manifest_name: &'a str,
    pub prebuilt_dir_name: &'a str,
}

/// Outcome of copying one internal dependency.
#[derive(Debug, Clone, PartialEq)]
pub struct CopiedDependency {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Regular files written, manifest included.
    pub files: usize,
}

/// Copy each internal dependency, in name order, one after another.
///
/// Stops at the first failure; dependencies copied before it stay in place.
pub fn install_internal(
    internal: &DependencyMap,
    layout: &CopyLayout<'_>,
) -> Result<Vec<CopiedDependency>, LayerError> {
    let mut copied = Vec::with_capacity(internal.len());
    for name in internal.keys() {
        let source = layout.source_modules_dir.join(name);
        let destination = layout.target_modules_dir.join(name);
        if !is_package_path(name) {
            return Err(LayerError::copy(
                source,
                destination,
                format!("'{name}' is not a valid package name"),
            ));
        }
        let files = copy_projection(&source, &destination, layout)?;
        tracing::info!(
            dependency = %name,
            files,
            destination = %destination.display(),
            "internal dependency copied"
        );
        copied.push(CopiedDependency {
            name: name.clone(),
            source,
            destination,
            files,
        });
    }
    Ok(copied)
}

/// `name` or `@scope/name`, nothing that can leave `node_modules/`.
fn is_package_path(name: &str) -> bool {
    let segments: Vec<&str> = name.split('/').collect();
    let expected = if name.starts_with('@') { 2 } else { 1 };
    segments.len() == expected
        && segments.iter().all(|segment| {
            !segment.is_empty() && *segment != "." && *segment != ".." && !segment.contains('\\')
        })
        && Path::new(name)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

/// Copy `<source>/<manifest>` and `<source>/<prebuilt>/**` to `destination`.
fn copy_projection(
    source: &Path,
    destination: &Path,
    layout: &CopyLayout<'_>,
) -> Result<usize, LayerError> {
    let root_meta = fs::metadata(source)
        .map_err(|err| LayerError::copy(source, destination, format!("resolve source: {err}")))?;
    if !root_meta.is_dir() {
        return Err(LayerError::copy(
            source,
            destination,
            "source is not a directory",
        ));
    }

    let manifest_source = source.join(layout.manifest_name);
    if !manifest_source.is_file() {
        return Err(LayerError::copy(
            &manifest_source,
            destination,
            "dependency manifest not found",
        ));
    }
    copy_file(&manifest_source, &destination.join(layout.manifest_name))?;
    let mut files = 1;

    let prebuilt_source = source.join(layout.prebuilt_dir_name);
    let prebuilt_destination = destination.join(layout.prebuilt_dir_name);
    match fs::metadata(&prebuilt_source) {
        Ok(meta) if meta.is_dir() => {
            files += copy_tree(&prebuilt_source, &prebuilt_destination)?;
        }
        Ok(_) => {
            copy_file(&prebuilt_source, &prebuilt_destination)?;
            files += 1;
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                path = %prebuilt_source.display(),
                "internal dependency has no prebuilt output; copying manifest only"
            );
        }
        Err(err) => {
            return Err(LayerError::copy(
                &prebuilt_source,
                &prebuilt_destination,
                err,
            ));
        }
    }
    Ok(files)
}

/// Recursively copy a directory, following symlinks.
fn copy_tree(source: &Path, destination: &Path) -> Result<usize, LayerError> {
    let mut files = 0;
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| LayerError::copy(source, destination, err))?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|err| LayerError::copy(entry.path(), destination, err))?;
        let target = destination.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|err| LayerError::copy(entry.path(), &target, err))?;
        } else if entry.file_type().is_file() {
            copy_file(entry.path(), &target)?;
            files += 1;
        }
    }
    Ok(files)
}

fn copy_file(source: &Path, destination: &Path) -> Result<(), LayerError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|err| LayerError::copy(source, destination, err))?;
    }
    fs::copy(source, destination).map_err(|err| LayerError::copy(source, destination, err))?;
    Ok(())
}
