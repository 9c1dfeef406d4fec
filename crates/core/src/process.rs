//! Process runner
//!
//! Runs a command to completion with captured output. The runner makes one
//! guarantee the error taxonomy depends on: a spawn failure (missing
//! binary, permission denied) is a [`ProcessError::Launch`], while a
//! command that ran and exited non-zero is a successful run whose
//! [`RunOutput::exit_code`] reflects the failure. Callers that need a
//! timeout wrap [`run`] themselves; the runner imposes none.

use crate::errors::ProcessError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Captured outcome of a completed command
#[derive(Debug)]
pub struct RunOutput {
    /// Process exit code (-1 if terminated by a signal)
    pub exit_code: i32,
    /// Complete standard output text
    pub stdout: String,
    /// Complete standard error text
    pub stderr: String,
}

impl RunOutput {
    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `program` with `args` in `cwd` and collect its complete output
///
/// Environment variables from the invoking process are inherited, with
/// `env` entries layered on top, so a child can locate whatever runtime it
/// needs. Exactly one OS process is created per invocation and it is always
/// reaped before this function returns.
#[instrument(skip(args, env))]
pub async fn run(
    program: &str,
    args: &[&str],
    cwd: &Path,
    env: &[(&str, &str)],
) -> Result<RunOutput, ProcessError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        command.env(key, value);
    }

    let child = command.spawn().map_err(|source| ProcessError::Launch {
        program: program.to_string(),
        source,
    })?;

    let output = child
        .wait_with_output()
        .await
        .map_err(|source| ProcessError::Wait {
            program: program.to_string(),
            source,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);
    debug!("{} exited with code {}", program, exit_code);

    Ok(RunOutput {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        std::env::current_dir().unwrap()
    }

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let output = run("echo", &["hello"], &cwd(), &[]).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_env_overrides() {
        let output = run("sh", &["-c", "echo $PROBE"], &cwd(), &[("PROBE", "42")])
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "42");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let output = run("sh", &["-c", "echo oops >&2; exit 3"], &cwd(), &[])
            .await
            .unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let result = run("definitely-not-a-real-binary", &[], &cwd(), &[]).await;
        assert!(matches!(result, Err(ProcessError::Launch { .. })));
    }
}
