//! Shared test infrastructure for integration tests.

use layer_build::{InstallerCommand, LayerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scope used by every fixture workspace.
pub const SCOPE: &str = "@scope/";

/// A throwaway package directory with a manifest and resolved `node_modules/`.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a workspace whose manifest declares `dependencies`.
    pub fn new(dependencies: &[(&str, &str)]) -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let deps = dependencies
            .iter()
            .map(|(name, version)| format!("        \"{name}\": \"{version}\","))
            .collect::<Vec<_>>()
            .join("\n");
        // Comments and trailing commas, as hand-edited manifests often have.
        let manifest = format!(
            "{{\n    // service manifest\n    \"name\": \"@scope/service\",\n    \"description\": \"meal service\",\n    \"license\": \"MIT\",\n    \"repository\": {{\"type\": \"git\", \"url\": \"https://example.com/repo.git\"}},\n    \"scripts\": {{\"build\": \"tsc\"}},\n    \"dependencies\": {{\n{deps}\n    }},\n}}\n"
        );
        fs::write(dir.path().join("package.json"), manifest)?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root().join("dist/nodejs")
    }

    /// Write a file under the workspace root, creating parents.
    pub fn write(&self, rel: &str, text: &str) -> anyhow::Result<()> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        Ok(())
    }

    /// Lay out a built internal package under `node_modules/`.
    pub fn add_internal_package(&self, name: &str) -> anyhow::Result<()> {
        let base = format!("node_modules/{name}");
        self.write(&format!("{base}/package.json"), &format!("{{\"name\":\"{name}\"}}"))?;
        self.write(&format!("{base}/dist/index.js"), "module.exports = {};")?;
        self.write(&format!("{base}/src/index.ts"), "export {};")?;
        Ok(())
    }

    /// Configuration pointing at this workspace with a fake installer.
    #[allow(dead_code)]
    pub fn config(&self, install_script: &str) -> LayerConfig {
        LayerConfig {
            workspace_root: self.root().to_path_buf(),
            internal_scope: SCOPE.to_string(),
            installer: InstallerCommand {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), install_script.to_string()],
                ..InstallerCommand::default()
            },
            ..LayerConfig::default()
        }
    }
}

/// Stand-in for `npm install`: records the manifest and env it saw, then
/// lays down a registry package and a lockfile the way npm would.
pub const FAKE_NPM: &str = r#"cp package.json ../observed-manifest.json
printf "$NODE_ENV" > ../observed-env.txt
mkdir -p node_modules/leftpad
echo 'module.exports = 1' > node_modules/leftpad/index.js
echo '{"name":"leftpad"}' > node_modules/leftpad/package.json
echo '{"lockfileVersion":3}' > package-lock.json
echo 'added 1 package'"#;

/// Skip a test when no POSIX shell is available to fake the installer.
pub fn skip_without_shell() -> bool {
    let missing = which::which("sh").is_err();
    if missing {
        eprintln!("Skipping: sh not available");
    }
    missing
}
