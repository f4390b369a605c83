//! Blocking external command execution with captured output.
use crate::error::LayerError;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::Instant;

/// Record of one finished, successful invocation.
#[derive(Debug, Clone)]
pub struct ProcessExecution {
    pub command: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Overrides applied on top of the inherited environment.
    pub env: Vec<(String, String)>,
    pub stdout: String,
    pub stderr: String,
    pub status: Option<i32>,
    pub signal: Option<i32>,
}

impl ProcessExecution {
    /// Command and arguments joined for display.
    pub fn command_line(&self) -> String {
        format_command_line(&self.command, &self.args)
    }
}

/// Run `command` in `cwd` and wait for it to exit.
///
/// The child inherits this process's environment plus `env`. A non-zero
/// exit (or death by signal) is a `ProcessExit` error carrying the full
/// captured stdout and stderr. No timeout is applied.
pub fn run(
    command: &str,
    args: &[String],
    cwd: &Path,
    env: &[(String, String)],
) -> Result<ProcessExecution, LayerError> {
    let command_line = format_command_line(command, args);
    let start = Instant::now();
    let output = Command::new(command)
        .args(args)
        .current_dir(cwd)
        .envs(env.iter().map(|(key, value)| (key, value)))
        .output()
        .map_err(|source| LayerError::ProcessSpawn {
            command: command_line.clone(),
            source,
        })?;
    let elapsed_ms = start.elapsed().as_millis();

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let signal = exit_signal(&output.status);

    tracing::info!(
        command = %command_line,
        cwd = %cwd.display(),
        elapsed_ms,
        status = ?output.status.code(),
        stdout_bytes = stdout.len(),
        stderr_bytes = stderr.len(),
        "process complete"
    );

    if !output.status.success() {
        return Err(LayerError::ProcessExit {
            command: command_line,
            status: output.status.code(),
            signal,
            stdout,
            stderr,
        });
    }

    Ok(ProcessExecution {
        command: command.to_string(),
        args: args.to_vec(),
        cwd: cwd.to_path_buf(),
        env: env.to_vec(),
        stdout,
        stderr,
        status: output.status.code(),
        signal,
    })
}

fn format_command_line(command: &str, args: &[String]) -> String {
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push(command);
    words.extend(args.iter().map(String::as_str));
    shell_words::join(words)
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
