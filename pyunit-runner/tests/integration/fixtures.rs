// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pyunit_runner::{
    cancel::CancellationToken,
    errors::CommandError,
    test_command::{CommandRunner, PythonCommand},
};
use std::future::Future;

/// Output printed by the discovery script for a small project with a nested package.
pub(crate) static FIXTURE_OUTPUT: &str = "\
Ran 0 tests in 0.000s\r
start\r
tests.test_math.TestAdd.test_positive\r
tests.test_math.TestAdd.test_negative\r
tests.test_math.TestSub.test_basic\r
\r
tests.io.test_files.TestRead.test_missing\r
broken_line\r
tests.io.test_files.TestRead.test_empty\r
";

/// A runner that returns canned output without spawning anything.
#[derive(Clone, Debug)]
pub(crate) struct CannedRunner {
    pub(crate) output: &'static str,
}

impl CommandRunner for CannedRunner {
    fn run(
        &self,
        command: &PythonCommand,
        _cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String, CommandError>> + Send {
        assert_eq!(command.args()[0], "-c", "script is passed via -c");
        std::future::ready(Ok(self.output.to_owned()))
    }
}

/// Writes an executable shell script that ignores its arguments and prints `output`.
#[cfg(unix)]
pub(crate) fn write_fake_python(
    dir: &camino::Utf8Path,
    output: &str,
) -> color_eyre::Result<camino::Utf8PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-python");
    let mut contents = String::from("#!/bin/sh\ncat <<'PYUNIT_EOF'\n");
    contents.push_str(output);
    contents.push_str("PYUNIT_EOF\n");
    std::fs::write(&path, contents)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}
