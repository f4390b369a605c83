//! Error taxonomy for a layer build.
//!
//! Each variant belongs to exactly one pipeline step; `LayerError::step`
//! exposes that mapping so callers can branch on where a run stopped.
use crate::manifest::TextLocation;
use crate::pipeline::Step;
use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by any stage of the layer build.
#[derive(Debug, Error)]
pub enum LayerError {
    /// The source manifest could not be opened or read.
    #[error("failed to read manifest '{}': {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source manifest is not valid JSON (comments and trailing commas allowed).
    #[error("failed to parse manifest '{}'{}: {message}", path.display(), display_location(location))]
    ManifestParse {
        path: PathBuf,
        message: String,
        location: Option<TextLocation>,
    },

    /// The reduced manifest could not be serialized or written.
    #[error("failed to write manifest '{}': {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external command could not be started.
    #[error("failed to start '{command}': {source}")]
    ProcessSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external command ran and exited unsuccessfully.
    #[error(
        "'{command}' exited unsuccessfully (status: {}, signal: {})\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}",
        display_opt(status),
        display_opt(signal)
    )]
    ProcessExit {
        command: String,
        status: Option<i32>,
        signal: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// An internal dependency could not be copied into the staging tree.
    #[error("failed to copy '{}' to '{}': {reason}", source_path.display(), destination.display())]
    Copy {
        source_path: PathBuf,
        destination: PathBuf,
        reason: String,
    },

    /// A manifest artifact could not be removed from the staging directory.
    #[error("failed to remove '{}': {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run configuration is unusable.
    #[error("invalid layer configuration: {message}")]
    InvalidConfig { message: String },
}

impl LayerError {
    /// Creates a copy error from any displayable cause.
    pub fn copy(
        source_path: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::Copy {
            source_path: source_path.into(),
            destination: destination.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// The pipeline step this error aborts.
    pub fn step(&self) -> Step {
        match self {
            Self::InvalidConfig { .. } => Step::Configure,
            Self::ManifestRead { .. } | Self::ManifestParse { .. } => Step::ReadManifest,
            Self::ManifestWrite { .. } => Step::WriteReducedManifest,
            Self::ProcessSpawn { .. } | Self::ProcessExit { .. } => Step::InstallExternal,
            Self::Copy { .. } => Step::InstallInternal,
            Self::Cleanup { .. } => Step::Cleanup,
        }
    }
}

fn display_location(location: &Option<TextLocation>) -> String {
    match location {
        Some(location) => format!(" at {location}"),
        None => String::new(),
    }
}

fn display_opt(value: &Option<i32>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "none".to_string(),
    }
}
