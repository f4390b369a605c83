//! Package manifest codec.
//!
//! Reads tolerate comments and trailing commas; writes emit compact strict
//! JSON. Only the fields a runtime layer needs survive the projection.
//! Comments are blanked in place before parsing so error positions still
//! point into the original text.
use crate::error::LayerError;
use json_comments::{strip_comments_in_place, CommentSettings};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Dependency name to version range. `None` means no pinned version.
pub type DependencyMap = BTreeMap<String, Option<String>>;

/// The subset of a package manifest carried into a layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque; passed through unmodified. An explicit `null` is kept.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub repository: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, serialize_with = "serialize_pinned")]
    pub dependencies: DependencyMap,
}

impl Manifest {
    /// Same descriptive fields, different dependency set.
    pub fn with_dependencies(&self, dependencies: DependencyMap) -> Self {
        Self {
            description: self.description.clone(),
            repository: self.repository.clone(),
            license: self.license.clone(),
            dependencies,
        }
    }
}

/// Line and column (1-based) of a manifest parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLocation {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for TextLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Why manifest text could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    pub message: String,
    pub location: Option<TextLocation>,
}

// Missing key stays `None` via `default`; anything present, `null` included, is `Some`.
fn deserialize_present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

// Unpinned entries are never written back.
fn serialize_pinned<S: Serializer>(deps: &DependencyMap, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        deps.iter()
            .filter_map(|(name, version)| version.as_ref().map(|version| (name, version))),
    )
}

/// Read and project a manifest from disk.
pub fn read_manifest(path: &Path) -> Result<Manifest, LayerError> {
    let bytes = fs::read(path).map_err(|source| LayerError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |failure: ParseFailure| LayerError::ManifestParse {
        path: path.to_path_buf(),
        message: failure.message,
        location: failure.location,
    };
    let raw = String::from_utf8(bytes).map_err(|err| {
        parse_err(ParseFailure {
            message: format!("manifest is not valid UTF-8: {err}"),
            location: None,
        })
    })?;
    parse_manifest(&raw).map_err(parse_err)
}

/// Parse manifest text, dropping unrecognized fields.
pub fn parse_manifest(raw: &str) -> Result<Manifest, ParseFailure> {
    let mut text = raw.to_string();
    strip_comments_in_place(text.as_mut_str(), CommentSettings::c_style(), true).map_err(
        |err| ParseFailure {
            message: format!("malformed comment: {err}"),
            location: None,
        },
    )?;
    serde_json::from_str::<Manifest>(&text).map_err(|err| ParseFailure {
        message: err.to_string(),
        location: if err.line() > 0 {
            Some(TextLocation {
                line: err.line(),
                column: err.column(),
            })
        } else {
            None
        },
    })
}

/// Write a manifest as compact JSON, creating parent directories as needed.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), LayerError> {
    let write_err = |source: std::io::Error| LayerError::ManifestWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let bytes = serde_json::to_vec(manifest).map_err(|err| write_err(std::io::Error::other(err)))?;
    fs::write(path, bytes).map_err(write_err)?;
    tracing::debug!(path = %path.display(), "manifest written");
    Ok(())
}
