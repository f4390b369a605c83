//! Run configuration for a layer build.
//!
//! Defaults follow npm conventions; the CLI overrides them field by field.
use crate::error::LayerError;
use std::path::PathBuf;

/// Scope prefix identifying packages produced inside the workspace.
pub const DEFAULT_INTERNAL_SCOPE: &str = "@meal-planner/";
pub const DEFAULT_BUILD_DIR: &str = "dist";
pub const DEFAULT_RUNTIME_DIR: &str = "nodejs";
pub const DEFAULT_INSTALL_COMMAND: &str = "npm install";
pub const MANIFEST_NAME: &str = "package.json";
pub const LOCKFILE_NAME: &str = "package-lock.json";
pub const MODULES_DIR: &str = "node_modules";

/// External package-manager invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallerCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Applied on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl InstallerCommand {
    /// Parse a shell-style command line; production mode is always forced.
    pub fn parse(command: &str) -> Result<Self, LayerError> {
        let mut words = shell_words::split(command).map_err(|err| {
            LayerError::invalid_config(format!("parse install command '{command}': {err}"))
        })?;
        if words.is_empty() {
            return Err(LayerError::invalid_config("install command is empty"));
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
            env: vec![("NODE_ENV".to_string(), "production".to_string())],
        })
    }
}

impl Default for InstallerCommand {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            args: vec!["install".to_string()],
            env: vec![("NODE_ENV".to_string(), "production".to_string())],
        }
    }
}

/// Everything a single layer build needs to know.
#[derive(Debug, Clone)]
pub struct LayerConfig {
    /// Directory holding the source manifest and resolved `node_modules/`.
    pub workspace_root: PathBuf,
    pub internal_scope: String,
    /// Build-output root, and the prebuilt-output directory of each internal dependency.
    pub build_dir: String,
    pub runtime_dir: String,
    pub manifest_name: String,
    pub lockfile_name: String,
    pub modules_dir: String,
    pub installer: InstallerCommand,
    /// Remove an existing staging directory before building.
    pub clean: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            internal_scope: DEFAULT_INTERNAL_SCOPE.to_string(),
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            runtime_dir: DEFAULT_RUNTIME_DIR.to_string(),
            manifest_name: MANIFEST_NAME.to_string(),
            lockfile_name: LOCKFILE_NAME.to_string(),
            modules_dir: MODULES_DIR.to_string(),
            installer: InstallerCommand::default(),
            clean: false,
        }
    }
}

impl LayerConfig {
    /// Reject configurations that would misclassify or misplace files.
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.internal_scope.is_empty() {
            return Err(LayerError::invalid_config(
                "internal scope must not be empty",
            ));
        }
        let names = [
            ("build dir", &self.build_dir),
            ("runtime dir", &self.runtime_dir),
            ("manifest name", &self.manifest_name),
            ("lockfile name", &self.lockfile_name),
            ("modules dir", &self.modules_dir),
        ];
        for (label, value) in names {
            if !is_single_component(value) {
                return Err(LayerError::invalid_config(format!(
                    "{label} must be a single path component, got '{value}'"
                )));
            }
        }
        if self.installer.program.is_empty() {
            return Err(LayerError::invalid_config("install command is empty"));
        }
        Ok(())
    }
}

fn is_single_component(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains('/')
        && !value.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        LayerConfig::default().validate().expect("valid");
    }

    #[test]
    fn default_installer_forces_production() {
        let installer = InstallerCommand::default();
        assert_eq!(installer.program, "npm");
        assert_eq!(installer.args, vec!["install"]);
        assert!(installer
            .env
            .contains(&("NODE_ENV".to_string(), "production".to_string())));
    }

    #[test]
    fn parse_splits_shell_words() {
        let installer = InstallerCommand::parse("npm install --no-audit --loglevel 'error'")
            .expect("parse");
        assert_eq!(installer.program, "npm");
        assert_eq!(
            installer.args,
            vec!["install", "--no-audit", "--loglevel", "error"]
        );
        assert_eq!(installer.env, InstallerCommand::default().env);
    }

    #[test]
    fn parse_rejects_empty_and_unbalanced_commands() {
        assert!(InstallerCommand::parse("   ").is_err());
        assert!(InstallerCommand::parse("npm 'install").is_err());
    }

    #[test]
    fn empty_scope_is_rejected() {
        let config = LayerConfig {
            internal_scope: String::new(),
            ..LayerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LayerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn nested_directory_names_are_rejected() {
        let config = LayerConfig {
            runtime_dir: "nodejs/lib".to_string(),
            ..LayerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
