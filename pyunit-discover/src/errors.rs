// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::FromPathBufError;
use owo_colors::OwoColorize;
use pyunit_metadata::PyunitExitCode;
use pyunit_runner::errors::*;
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are mostly placeholder messages. The expected way to print out errors is
// with the display_to_stderr method, which colorizes errors.

/// An error that pyunit-discover knows how to report.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine current directory")]
    GetCurrentDirFailed {
        #[source]
        error: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 {
        #[source]
        error: FromPathBufError,
    },
    #[error("user config error")]
    UserConfigError {
        #[from]
        err: UserConfigError,
    },
    #[error("failed to create Tokio runtime")]
    TokioRuntimeCreateError {
        #[source]
        err: std::io::Error,
    },
    #[error("test discovery failed")]
    DiscoverTestsError {
        #[from]
        err: DiscoverTestsError,
    },
    #[error("failed to write test list")]
    WriteTestListError {
        #[from]
        err: WriteTestListError,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::GetCurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::UserConfigError { .. }
            | Self::TokioRuntimeCreateError { .. } => PyunitExitCode::SETUP_ERROR,
            Self::DiscoverTestsError { err } => match err {
                DiscoverTestsError::Cancelled => PyunitExitCode::CANCELLED,
                DiscoverTestsError::ScriptTemplate(_) => PyunitExitCode::SETUP_ERROR,
                DiscoverTestsError::Command(_) => PyunitExitCode::DISCOVERY_FAILED,
            },
            Self::WriteTestListError { .. } => PyunitExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::GetCurrentDirFailed { error } => {
                error!("could not determine current directory");
                Some(error as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { error } => {
                error!("current directory is not valid UTF-8");
                Some(error as &dyn Error)
            }
            Self::UserConfigError { err } => {
                error!("{err}");
                err.source()
            }
            Self::TokioRuntimeCreateError { err } => {
                error!("failed to create Tokio runtime");
                Some(err as &dyn Error)
            }
            Self::DiscoverTestsError { err } => display_discover_error(err, styles),
            Self::WriteTestListError { err } => {
                error!("failed to write test list to output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {err}");
            next_error = err.source();
        }
    }
}

fn display_discover_error<'a>(
    err: &'a DiscoverTestsError,
    styles: &StderrStyles,
) -> Option<&'a (dyn Error + 'static)> {
    match err {
        DiscoverTestsError::Cancelled => {
            error!("test discovery was cancelled");
            None
        }
        DiscoverTestsError::ScriptTemplate(err) => {
            error!(
                "{} `{}` can't be passed to the discovery script: it contains {:?}",
                err.kind(),
                err.value().style(styles.bold),
                err.forbidden(),
            );
            None
        }
        DiscoverTestsError::Command(CommandError::CommandFail {
            program,
            exit_status,
            stderr,
            ..
        }) => {
            error!(
                "discovery command `{}` failed with {exit_status}",
                program.style(styles.bold),
            );
            if !stderr.trim().is_empty() {
                error!(
                    target: NO_HEADING_TARGET,
                    "\n{}\n{}",
                    "--- stderr:".style(styles.bold),
                    stderr.trim_end(),
                );
            }
            None
        }
        DiscoverTestsError::Command(CommandError::ExecFail { program, error }) => {
            error!(
                "failed to execute discovery command `{}`",
                program.style(styles.bold),
            );
            Some(error as &dyn Error)
        }
        DiscoverTestsError::Command(err @ CommandError::Cancelled { .. }) => {
            error!("{err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn exit_codes() {
        let cases = [
            (
                ExpectedError::from(DiscoverTestsError::Cancelled),
                PyunitExitCode::CANCELLED,
            ),
            (
                ExpectedError::from(DiscoverTestsError::Command(CommandError::ExecFail {
                    program: "python".to_owned(),
                    error: io::Error::from(io::ErrorKind::NotFound),
                })),
                PyunitExitCode::DISCOVERY_FAILED,
            ),
            (
                ExpectedError::from(WriteTestListError::Io(io::Error::from(
                    io::ErrorKind::BrokenPipe,
                ))),
                PyunitExitCode::WRITE_OUTPUT_ERROR,
            ),
            (
                ExpectedError::TokioRuntimeCreateError {
                    err: io::Error::other("no threads"),
                },
                PyunitExitCode::SETUP_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.process_exit_code(), expected, "for {error:?}");
        }
    }
}
