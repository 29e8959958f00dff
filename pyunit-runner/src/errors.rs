// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by pyunit-runner.

use camino::{FromPathBufError, Utf8PathBuf};
use std::{fmt, process::ExitStatus};
use thiserror::Error;

/// An error that occurred while discovering tests.
#[derive(Debug, Error)]
pub enum DiscoverTestsError {
    /// Cancellation was requested before discovery completed.
    #[error("test discovery was cancelled")]
    Cancelled,

    /// A discovery argument couldn't be passed into the discovery script.
    #[error("failed to render discovery script")]
    ScriptTemplate(#[from] ScriptTemplateError),

    /// Running the discovery command failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Which discovery argument a [`ScriptTemplateError`] refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScriptArgKind {
    /// The `-s` start directory.
    StartDirectory,

    /// The `-p` file pattern.
    Pattern,
}

impl fmt::Display for ScriptArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartDirectory => write!(f, "start directory"),
            Self::Pattern => write!(f, "pattern"),
        }
    }
}

/// A discovery argument contains a character that can't be placed inside a Python string
/// literal without escaping.
#[derive(Clone, Debug, Error)]
#[error("{kind} `{value}` contains {forbidden:?}, which is not allowed in the discovery script")]
pub struct ScriptTemplateError {
    kind: ScriptArgKind,
    value: String,
    forbidden: char,
}

impl ScriptTemplateError {
    pub(crate) fn new(kind: ScriptArgKind, value: impl Into<String>, forbidden: char) -> Self {
        Self {
            kind,
            value: value.into(),
            forbidden,
        }
    }

    /// Returns the argument this error refers to.
    pub fn kind(&self) -> ScriptArgKind {
        self.kind
    }

    /// Returns the rejected value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the first forbidden character found in the value.
    pub fn forbidden(&self) -> char {
        self.forbidden
    }
}

/// An error that occurred while running the discovery command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started or waited on.
    #[error("failed to execute `{program}`")]
    ExecFail {
        /// The program that was executed.
        program: String,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The process exited with a failure status.
    #[error("`{program}` failed with {exit_status}")]
    CommandFail {
        /// The program that was executed.
        program: String,

        /// The exit status of the process.
        exit_status: ExitStatus,

        /// Standard output, decoded lossily.
        stdout: String,

        /// Standard error, decoded lossily.
        stderr: String,
    },

    /// Cancellation was requested while the process was running. The process was killed.
    #[error("`{program}` was cancelled")]
    Cancelled {
        /// The program that was executed.
        program: String,
    },
}

/// An error that occurred while loading user config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UserConfigError {
    /// The user config directory path isn't valid UTF-8.
    #[error("user config directory path is not valid UTF-8")]
    NonUtf8Path {
        /// The underlying error.
        #[source]
        error: FromPathBufError,
    },

    /// An explicitly specified user config file wasn't found.
    #[error("user config file not found at `{path}`")]
    FileNotFound {
        /// The path that was specified.
        path: Utf8PathBuf,
    },

    /// The user config file couldn't be read.
    #[error("failed to read user config at `{path}`")]
    Read {
        /// The path to the file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The user config file couldn't be parsed.
    #[error("failed to parse user config at `{path}`")]
    Parse {
        /// The path to the file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: toml::de::Error,
    },
}

/// An error that occurred while writing a test list.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteTestListError {
    /// An error occurred while writing human-readable output.
    #[error("error writing to output")]
    Io(#[source] std::io::Error),

    /// An error occurred while serializing JSON.
    #[error("error serializing to JSON")]
    Json(#[source] serde_json::Error),
}
