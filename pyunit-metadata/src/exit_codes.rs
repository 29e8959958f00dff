// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `pyunit-discover` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum PyunitExitCode {}

impl PyunitExitCode {
    /// No errors occurred and pyunit-discover exited normally.
    pub const OK: i32 = 0;

    /// Discovery succeeded, but no tests were found.
    pub const NO_TESTS_FOUND: i32 = 4;

    /// Running the discovery command produced an error.
    pub const DISCOVERY_FAILED: i32 = 104;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;

    /// A user issue happened while setting up a discovery invocation, for example an invalid
    /// config file or an argument that can't be passed into the discovery script.
    pub const SETUP_ERROR: i32 = 96;

    /// Discovery was cancelled, typically by Ctrl-C.
    pub const CANCELLED: i32 = 130;
}
