// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ties together argument extraction, script rendering, command invocation and tree building.

use crate::{
    cancel::CancellationToken,
    errors::{CommandError, DiscoverTestsError, ScriptTemplateError},
    helpers::plural,
    list::{DiscoverArgs, TestList, scan_test_ids},
    script::DiscoveryScript,
    test_command::{CommandRunner, PythonCommand},
    user_config::DiscoveryConfig,
};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

/// Discovers `unittest` tests under a root directory.
#[derive(Clone, Debug)]
pub struct TestDiscoverer {
    root_dir: Utf8PathBuf,
    args: DiscoverArgs,
    python_path: String,
}

impl TestDiscoverer {
    /// Creates a new discoverer.
    ///
    /// `argv` is scanned for `-s` and `-p`. If it is empty, the config's default arguments are
    /// scanned instead.
    pub fn new(
        root_dir: impl Into<Utf8PathBuf>,
        argv: &[impl AsRef<str>],
        config: &DiscoveryConfig,
    ) -> Self {
        let args = if argv.is_empty() {
            DiscoverArgs::extract(config.default_args.as_slice())
        } else {
            DiscoverArgs::extract(argv)
        };
        Self {
            root_dir: root_dir.into(),
            args,
            python_path: config.python_path.clone(),
        }
    }

    /// Returns the root directory. The discovery script runs here.
    pub fn root_dir(&self) -> &Utf8Path {
        &self.root_dir
    }

    /// Returns the extracted discovery arguments.
    pub fn args(&self) -> &DiscoverArgs {
        &self.args
    }

    /// Returns the directory that test identifiers are resolved against.
    pub fn tests_dir(&self) -> Utf8PathBuf {
        self.args.tests_directory(&self.root_dir)
    }

    /// Returns the command that will be run to list tests.
    pub fn command(&self) -> Result<PythonCommand, ScriptTemplateError> {
        let script = DiscoveryScript::new(&self.args)?;
        Ok(PythonCommand::new(
            self.python_path.clone(),
            self.root_dir.clone(),
            &script,
        ))
    }

    /// Runs discovery and builds the resulting test tree.
    ///
    /// If `cancel` is triggered at any point before the tree is built, returns
    /// [`DiscoverTestsError::Cancelled`] and no tree.
    pub async fn discover(
        &self,
        runner: &impl CommandRunner,
        cancel: &CancellationToken,
    ) -> Result<TestList, DiscoverTestsError> {
        let command = self.command()?;
        if cancel.is_cancelled() {
            return Err(DiscoverTestsError::Cancelled);
        }

        debug!(
            "discovering tests: start directory `{}`, pattern `{}`",
            self.args.start_directory, self.args.pattern,
        );
        let output = runner
            .run(&command, cancel)
            .await
            .map_err(|error| match error {
                CommandError::Cancelled { .. } => DiscoverTestsError::Cancelled,
                other => DiscoverTestsError::Command(other),
            })?;

        let test_ids = scan_test_ids(&output, cancel);
        if cancel.is_cancelled() {
            return Err(DiscoverTestsError::Cancelled);
        }

        let test_list = TestList::from_test_ids(self.tests_dir(), test_ids);
        info!(
            "discovered {} {} in {} {} across {} {}",
            test_list.test_count(),
            plural::tests_str(test_list.test_count()),
            test_list.suite_count(),
            plural::suites_str(test_list.suite_count()),
            test_list.file_count(),
            plural::files_str(test_list.file_count()),
        );
        Ok(test_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::{future::Future, sync::Mutex};

    /// Returns canned output and records the commands it was asked to run.
    struct FakeRunner {
        output: Result<&'static str, fn(&PythonCommand) -> CommandError>,
        cancel_after_run: bool,
        commands: Mutex<Vec<PythonCommand>>,
    }

    impl FakeRunner {
        fn new(output: &'static str) -> Self {
            Self {
                output: Ok(output),
                cancel_after_run: false,
                commands: Mutex::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(
            &self,
            command: &PythonCommand,
            cancel: &CancellationToken,
        ) -> impl Future<Output = Result<String, CommandError>> + Send {
            self.commands.lock().unwrap().push(command.clone());
            if self.cancel_after_run {
                cancel.cancel();
            }
            let result = match self.output {
                Ok(output) => Ok(output.to_owned()),
                Err(make_error) => Err(make_error(command)),
            };
            std::future::ready(result)
        }
    }

    static OUTPUT: &str = indoc! {"
        importing test modules
        start
        pkg.test_a.TestA.test_one
        pkg.test_a.TestA.test_two

        test_b.TestB.test_three
    "};

    #[tokio::test]
    async fn test_discover() {
        let runner = FakeRunner::new(OUTPUT);
        let discoverer = TestDiscoverer::new(
            "/repo",
            &["-s", "./tests"],
            &DiscoveryConfig::default(),
        );
        let test_list = discoverer
            .discover(&runner, &CancellationToken::new())
            .await
            .expect("discovery succeeded");

        assert_eq!(test_list.tests_dir(), "/repo/tests");
        assert_eq!(test_list.test_count(), 3);
        let paths: Vec<_> = test_list.iter().map(|file| file.full_path.as_str()).collect();
        assert_eq!(paths, ["/repo/tests/pkg/test_a.py", "/repo/tests/test_b.py"]);

        let commands = runner.commands.lock().unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].program(), "python");
        assert_eq!(commands[0].cwd(), "/repo");
        assert!(commands[0].args()[1].contains(r#"loader.discover("./tests", pattern="test*.py")"#));
    }

    #[tokio::test]
    async fn test_discover_uses_config_args() {
        let runner = FakeRunner::new("start\n");
        let config = DiscoveryConfig {
            python_path: "python3".to_owned(),
            default_args: vec!["-p".to_owned(), "check_*.py".to_owned()],
        };
        let discoverer = TestDiscoverer::new("/repo", &[] as &[&str], &config);
        assert_eq!(discoverer.args().pattern, "check_*.py");

        let test_list = discoverer
            .discover(&runner, &CancellationToken::new())
            .await
            .expect("discovery succeeded");
        assert!(test_list.is_empty());
        assert_eq!(runner.commands.lock().unwrap()[0].program(), "python3");
    }

    #[tokio::test]
    async fn test_discover_cancelled_before_run() {
        let runner = FakeRunner::new(OUTPUT);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let discoverer = TestDiscoverer::new("/repo", &[] as &[&str], &DiscoveryConfig::default());
        let error = discoverer.discover(&runner, &cancel).await.unwrap_err();
        assert!(matches!(error, DiscoverTestsError::Cancelled), "{error:?}");
        assert!(runner.commands.lock().unwrap().is_empty(), "runner not invoked");
    }

    #[tokio::test]
    async fn test_discover_cancelled_after_run() {
        let runner = FakeRunner {
            cancel_after_run: true,
            ..FakeRunner::new(OUTPUT)
        };
        let discoverer = TestDiscoverer::new("/repo", &[] as &[&str], &DiscoveryConfig::default());
        let error = discoverer
            .discover(&runner, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(error, DiscoverTestsError::Cancelled), "{error:?}");
    }

    #[tokio::test]
    async fn test_discover_runner_cancelled() {
        let runner = FakeRunner {
            output: Err(|command| CommandError::Cancelled {
                program: command.program().to_owned(),
            }),
            ..FakeRunner::new("")
        };
        let discoverer = TestDiscoverer::new("/repo", &[] as &[&str], &DiscoveryConfig::default());
        let error = discoverer
            .discover(&runner, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(error, DiscoverTestsError::Cancelled), "{error:?}");
    }

    #[tokio::test]
    async fn test_discover_runner_failure_passes_through() {
        let runner = FakeRunner {
            output: Err(|command| CommandError::ExecFail {
                program: command.program().to_owned(),
                error: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            ..FakeRunner::new("")
        };
        let discoverer = TestDiscoverer::new("/repo", &[] as &[&str], &DiscoveryConfig::default());
        let error = discoverer
            .discover(&runner, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(
            matches!(
                error,
                DiscoverTestsError::Command(CommandError::ExecFail { .. })
            ),
            "{error:?}"
        );
    }

    #[tokio::test]
    async fn test_discover_rejects_unsafe_args() {
        let runner = FakeRunner::new(OUTPUT);
        let discoverer = TestDiscoverer::new(
            "/repo",
            &["-s", "bad\"dir"],
            &DiscoveryConfig::default(),
        );
        let error = discoverer
            .discover(&runner, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(
            matches!(error, DiscoverTestsError::ScriptTemplate(_)),
            "{error:?}"
        );
        assert!(runner.commands.lock().unwrap().is_empty(), "runner not invoked");
    }
}
