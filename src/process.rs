//! Thin async wrapper around external command execution.

use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{Result, ScribeError};

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` with `args` and return the raw output regardless of exit code.
pub async fn output(program: &str, args: &[String]) -> Result<CommandOutput> {
    tracing::debug!("Running: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ScribeError::Spawn {
            program: program.to_string(),
            source,
        })?;

    Ok(CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Run a command and return stdout, failing on a non-zero exit.
pub async fn run(program: &str, args: &[String]) -> Result<String> {
    let out = output(program, args).await?;
    if !out.status.success() {
        return Err(ScribeError::command_failed(
            program,
            args,
            out.stderr.trim().to_string(),
        ));
    }
    Ok(out.stdout)
}

/// Run a command feeding `input` on stdin.
pub async fn run_with_stdin(program: &str, args: &[String], input: &str) -> Result<()> {
    tracing::debug!("Running with stdin: {} {}", program, args.join(" "));

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ScribeError::Spawn {
            program: program.to_string(),
            source,
        })?;

    // The pipe is closed at the end of this block; the child is waited on even
    // when it stopped reading early.
    let written = match child.stdin.take() {
        Some(mut stdin) => match stdin.write_all(input.as_bytes()).await {
            Ok(()) => stdin.shutdown().await,
            Err(e) => Err(e),
        },
        None => Ok(()),
    };

    let out = child.wait_with_output().await?;
    if !out.status.success() {
        return Err(ScribeError::command_failed(
            program,
            args,
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }
    written?;
    Ok(())
}

/// Convenience for building owned argument lists.
pub fn args<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let out = run("echo", &args(["hello"])).await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_command_failed() {
        let err = run("false", &[]).await.unwrap_err();
        assert!(matches!(err, ScribeError::CommandFailed { ref program, .. } if program == "false"));
    }

    #[tokio::test]
    async fn test_stdin_is_delivered() {
        run_with_stdin("cat", &[], "clipboard text").await.unwrap();
    }

    #[tokio::test]
    async fn test_reader_exiting_early_is_reported() {
        // `true` never reads, so a payload larger than the pipe buffer breaks it.
        let input = "x".repeat(1 << 20);
        let err = run_with_stdin("true", &[], &input).await.unwrap_err();
        assert!(matches!(err, ScribeError::Io(_)));
    }
}
