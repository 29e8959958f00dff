// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Running the discovery script under a Python interpreter.

use crate::{cancel::CancellationToken, errors::CommandError, script::DiscoveryScript};
use camino::{Utf8Path, Utf8PathBuf};
use std::{future::Future, process::Stdio};
use tracing::{debug, warn};

/// A command that runs the discovery script: `<program> -c <script>` in a working directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PythonCommand {
    program: String,
    args: Vec<String>,
    cwd: Utf8PathBuf,
}

impl PythonCommand {
    /// Creates a new command that runs `script` with the interpreter at `program`.
    pub fn new(
        program: impl Into<String>,
        cwd: impl Into<Utf8PathBuf>,
        script: &DiscoveryScript,
    ) -> Self {
        Self {
            program: program.into(),
            args: vec!["-c".to_owned(), script.as_str().to_owned()],
            cwd: cwd.into(),
        }
    }

    /// Returns the interpreter to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments passed to the interpreter.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the working directory.
    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }
}

/// Runs a [`PythonCommand`] and returns its captured output.
pub trait CommandRunner {
    /// Runs the command to completion, returning its combined output: standard output followed
    /// by standard error.
    ///
    /// If `cancel` is triggered while the command is running, the command is stopped and
    /// [`CommandError::Cancelled`] is returned.
    fn run(
        &self,
        command: &PythonCommand,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String, CommandError>> + Send;
}

/// A [`CommandRunner`] that spawns a child process.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command: &PythonCommand,
        cancel: &CancellationToken,
    ) -> Result<String, CommandError> {
        debug!(
            "running `{}` in {} with {} arguments",
            command.program,
            command.cwd,
            command.args.len(),
        );

        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.cwd)
            // Capture stdout and stderr, and close stdin.
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|error| CommandError::ExecFail {
            program: command.program.clone(),
            error,
        })?;

        // Dropping the child on cancellation kills it.
        let output = tokio::select! {
            output = child.wait_with_output() => output.map_err(|error| CommandError::ExecFail {
                program: command.program.clone(),
                error,
            })?,
            () = cancel.cancelled() => {
                debug!("cancelled while running `{}`", command.program);
                return Err(CommandError::Cancelled {
                    program: command.program.clone(),
                });
            }
        };

        let stdout = decode_lossy(&command.program, "stdout", output.stdout);
        let stderr = decode_lossy(&command.program, "stderr", output.stderr);
        if !stderr.is_empty() {
            debug!("`{}` stderr:\n{stderr}", command.program);
        }

        if output.status.success() {
            debug!("`{}` stdout:\n{stdout}", command.program);
            Ok(combine_output(stdout, &stderr))
        } else {
            Err(CommandError::CommandFail {
                program: command.program.clone(),
                exit_status: output.status,
                stdout,
                stderr,
            })
        }
    }
}

/// Appends stderr to stdout, keeping the last stdout line separate from the first stderr line.
fn combine_output(mut stdout: String, stderr: &str) -> String {
    if stderr.is_empty() {
        return stdout;
    }
    if !stdout.is_empty() && !stdout.ends_with('\n') {
        stdout.push('\n');
    }
    stdout.push_str(stderr);
    stdout
}

fn decode_lossy(program: &str, stream: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(error) => {
            warn!("{stream} of `{program}` is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(error.as_bytes()).into_owned()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::list::DiscoverArgs;

    fn sh_command(script: &str) -> PythonCommand {
        // `sh -c <script>` has the same shape as `python -c <script>`.
        PythonCommand {
            program: "sh".to_owned(),
            args: vec!["-c".to_owned(), script.to_owned()],
            cwd: Utf8PathBuf::from("/"),
        }
    }

    #[test]
    fn test_python_command_new() {
        let script = DiscoveryScript::new(&DiscoverArgs::default()).unwrap();
        let command = PythonCommand::new("python3", "/repo", &script);
        assert_eq!(command.program(), "python3");
        assert_eq!(command.args()[0], "-c");
        assert_eq!(command.args()[1], script.as_str());
        assert_eq!(command.cwd(), "/repo");
    }

    #[tokio::test]
    async fn test_process_runner_stdout() {
        let command = sh_command("echo noise; echo start; echo a.B.c; echo d.E.f >&2");
        let output = ProcessRunner
            .run(&command, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "noise\nstart\na.B.c\nd.E.f\n");
    }

    #[test]
    fn test_combine_output() {
        assert_eq!(combine_output("start\n".to_owned(), ""), "start\n");
        assert_eq!(combine_output(String::new(), "a.B.c\n"), "a.B.c\n");
        assert_eq!(combine_output("start\n".to_owned(), "a.B.c\n"), "start\na.B.c\n");
        assert_eq!(combine_output("start".to_owned(), "a.B.c"), "start\na.B.c");
    }

    #[tokio::test]
    async fn test_process_runner_failure() {
        let command = sh_command("echo partial; echo oops >&2; exit 3");
        let error = ProcessRunner
            .run(&command, &CancellationToken::new())
            .await
            .unwrap_err();
        match error {
            CommandError::CommandFail {
                exit_status,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(exit_status.code(), Some(3));
                assert_eq!(stdout, "partial\n");
                assert_eq!(stderr, "oops\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_process_runner_exec_fail() {
        let mut command = sh_command("true");
        command.program = "/nonexistent/pyunit-python".to_owned();
        let error = ProcessRunner
            .run(&command, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(
            matches!(error, CommandError::ExecFail { .. }),
            "unexpected error: {error:?}"
        );
    }

    #[tokio::test]
    async fn test_process_runner_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let error = ProcessRunner
            .run(&sh_command("sleep 30"), &cancel)
            .await
            .unwrap_err();
        assert!(
            matches!(error, CommandError::Cancelled { .. }),
            "unexpected error: {error:?}"
        );
    }
}
