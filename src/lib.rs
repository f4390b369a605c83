//! Runtime layer builder.
//!
//! Stages the runtime dependencies of a package into `<build>/<runtime>`:
//! registry packages are installed by the package manager from a reduced
//! manifest, workspace packages are copied from their prebuilt output, and
//! the installer's manifest artifacts are removed afterwards.
pub mod cli;
pub mod config;
pub mod deps;
pub mod error;
pub mod external;
pub mod internal;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod process;
pub mod staging;

pub use config::{InstallerCommand, LayerConfig};
pub use deps::{split_dependencies, DependencyGroups};
pub use error::LayerError;
pub use manifest::{read_manifest, write_manifest, DependencyMap, Manifest};
pub use pipeline::{build_layer, cleanup, LayerReport, Step};
