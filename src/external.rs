//! Registry dependency install via the package manager.
use crate::config::InstallerCommand;
use crate::error::LayerError;
use crate::process::{self, ProcessExecution};
use std::path::Path;

/// Run the installer inside `staging_dir`. Failures propagate unchanged; never retried.
pub fn install_external(
    installer: &InstallerCommand,
    staging_dir: &Path,
) -> Result<ProcessExecution, LayerError> {
    tracing::info!(
        program = %installer.program,
        cwd = %staging_dir.display(),
        "installing external dependencies"
    );
    let execution = process::run(
        &installer.program,
        &installer.args,
        staging_dir,
        &installer.env,
    )?;
    let stdout = execution.stdout.trim();
    if !stdout.is_empty() {
        tracing::info!(command = %execution.command_line(), "{stdout}");
    }
    let stderr = execution.stderr.trim();
    if !stderr.is_empty() {
        tracing::debug!(command = %execution.command_line(), "{stderr}");
    }
    Ok(execution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn installer_sees_production_env_and_staging_cwd() {
        if which::which("sh").is_err() {
            return;
        }
        let dir = tempdir().expect("tempdir");
        let installer =
            InstallerCommand::parse(r#"sh -c 'printf "$NODE_ENV" > env.txt'"#).expect("parse");
        install_external(&installer, dir.path()).expect("install");
        let recorded = std::fs::read_to_string(dir.path().join("env.txt")).expect("read");
        assert_eq!(recorded, "production");
    }

    #[test]
    fn failing_installer_is_process_exit() {
        if which::which("sh").is_err() {
            return;
        }
        let dir = tempdir().expect("tempdir");
        let installer = InstallerCommand::parse("sh -c 'exit 3'").expect("parse");
        let err = install_external(&installer, dir.path()).unwrap_err();
        assert!(matches!(
            err,
            LayerError::ProcessExit {
                status: Some(3),
                ..
            }
        ));
    }
}
