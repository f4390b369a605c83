//! CLI argument parsing for the layer build.
use crate::config::{
    InstallerCommand, LayerConfig, DEFAULT_BUILD_DIR, DEFAULT_INSTALL_COMMAND,
    DEFAULT_INTERNAL_SCOPE, DEFAULT_RUNTIME_DIR,
};
use crate::error::LayerError;
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "build-layer",
    version,
    about = "Stage a package's runtime dependencies into a deployable layer",
    after_help = "Layout:\n  <cwd>/package.json            source manifest\n  <cwd>/node_modules/<name>      resolved dependencies\n  <cwd>/<build>/<runtime>/       staged layer (default dist/nodejs)\n\nExamples:\n  build-layer\n  build-layer --cwd packages/api --scope @acme/\n  build-layer --install-command \"npm ci --no-audit\" --clean --json"
)]
pub struct LayerArgs {
    /// Package directory containing package.json and node_modules
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub cwd: PathBuf,

    /// Name prefix identifying workspace-internal packages
    #[arg(long, value_name = "PREFIX", env = "LAYER_SCOPE", default_value = DEFAULT_INTERNAL_SCOPE)]
    pub scope: String,

    /// Package-manager install command run inside the staging directory
    #[arg(
        long,
        value_name = "CMD",
        env = "LAYER_INSTALL_COMMAND",
        default_value = DEFAULT_INSTALL_COMMAND
    )]
    pub install_command: String,

    /// Build-output directory (also the prebuilt-output dir of internal packages)
    #[arg(long, value_name = "NAME", default_value = DEFAULT_BUILD_DIR)]
    pub build_dir: String,

    /// Runtime subdirectory under the build-output directory
    #[arg(long, value_name = "NAME", default_value = DEFAULT_RUNTIME_DIR)]
    pub runtime_dir: String,

    /// Remove an existing staging directory before building
    #[arg(long)]
    pub clean: bool,

    /// Emit a machine-readable report on success
    #[arg(long)]
    pub json: bool,

    /// Log progress to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl LayerArgs {
    /// Resolve arguments into a run configuration.
    pub fn to_config(&self) -> Result<LayerConfig, LayerError> {
        Ok(LayerConfig {
            workspace_root: self.cwd.clone(),
            internal_scope: self.scope.clone(),
            build_dir: self.build_dir.clone(),
            runtime_dir: self.runtime_dir.clone(),
            installer: InstallerCommand::parse(&self.install_command)?,
            clean: self.clean,
            ..LayerConfig::default()
        })
    }
}
