// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The execution status of a test node.
///
/// Every node starts out as [`TestStatus::Idle`] after discovery. Other states are set by an
/// execution subsystem.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestStatus {
    /// The test has not been run.
    #[default]
    Idle,

    /// The test is currently running.
    Running,

    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// The test errored out, for example because of an exception in a fixture.
    Error,

    /// The test was skipped.
    Skipped,
}

impl TestStatus {
    /// Returns the string representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["idle", "running", "passed", "failed", "error", "skipped"]
    }

    /// Returns the string representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single test function, the leaf of the test tree.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestFunction {
    /// The function name, e.g. `test_one`.
    pub name: String,

    /// The fully-qualified identifier used to run this test, e.g. `pkg.mod.TestA.test_one`.
    pub name_to_run: String,

    /// The execution status.
    pub status: TestStatus,

    /// Elapsed time in seconds.
    pub time: f64,
}

impl TestFunction {
    /// Creates a new, idle test function.
    pub fn new(name: impl Into<String>, name_to_run: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_to_run: name_to_run.into(),
            status: TestStatus::Idle,
            time: 0.0,
        }
    }
}

/// A test suite, corresponding to a test class.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestSuite {
    /// The class name.
    pub name: String,

    /// The name used to run this suite. Suites within a file are unique by this name.
    pub name_to_run: String,

    /// Test functions within this suite, in discovery order.
    pub functions: Vec<TestFunction>,

    /// Nested suites, for nested test classes.
    pub suites: Vec<TestSuite>,

    /// Whether this suite is a `unittest.TestCase` class.
    pub is_unit_test: bool,

    /// Whether this suite is an instance rather than a class reference.
    pub is_instance: bool,

    /// The execution status.
    pub status: TestStatus,

    /// Elapsed time in seconds.
    pub time: f64,
}

impl TestSuite {
    /// Creates a new, empty suite for a `unittest.TestCase` class.
    pub fn new_unit_test(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            name: class_name.clone(),
            name_to_run: class_name,
            functions: Vec::new(),
            suites: Vec::new(),
            is_unit_test: true,
            is_instance: false,
            status: TestStatus::Idle,
            time: 0.0,
        }
    }
}

/// A Python source file containing tests.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestFile {
    /// The base name of the file, e.g. `test_foo.py`.
    pub name: String,

    /// The absolute path to the file. Files are unique by this path.
    pub full_path: Utf8PathBuf,

    /// Suites within this file, in discovery order.
    pub suites: Vec<TestSuite>,

    /// Module-level test functions.
    pub functions: Vec<TestFunction>,

    /// A hint for running this file, seeded from the first test discovered in it.
    pub name_to_run: String,

    /// The execution status.
    pub status: TestStatus,

    /// Elapsed time in seconds.
    pub time: f64,
}

impl TestFile {
    /// Creates a new, empty test file.
    pub fn new(full_path: impl Into<Utf8PathBuf>, name_to_run: impl Into<String>) -> Self {
        let full_path = full_path.into();
        Self {
            name: full_path.file_name().unwrap_or_default().to_owned(),
            full_path,
            suites: Vec::new(),
            functions: Vec::new(),
            name_to_run: name_to_run.into(),
            status: TestStatus::Idle,
            time: 0.0,
        }
    }

    /// Returns the number of test functions in this file, including those in suites.
    pub fn function_count(&self) -> usize {
        self.functions.len()
            + self
                .suites
                .iter()
                .map(|suite| suite.functions.len())
                .sum::<usize>()
    }
}

/// Serializable form of a discovered test tree.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestListSummary {
    /// The directory that test file paths were resolved against.
    pub tests_dir: Utf8PathBuf,

    /// The number of test functions across all files.
    pub test_count: usize,

    /// The test tree, in discovery order.
    pub test_files: Vec<TestFile>,
}

/// A test function along with references to its parents.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlattenedTestFunction {
    /// The fully-qualified identifier of the function.
    pub name_to_run: String,

    /// The dotted class name used in XML reports: the identifier without its function name.
    pub xml_class_name: String,

    /// The `name_to_run` of the parent suite, or `None` for module-level functions.
    pub parent_suite: Option<String>,

    /// The full path of the parent file.
    pub parent_file: Utf8PathBuf,

    /// The execution status.
    pub status: TestStatus,
}

/// A test suite along with a reference to its file.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlattenedTestSuite {
    /// The `name_to_run` of the suite.
    pub name_to_run: String,

    /// The dotted class name used in XML reports.
    pub xml_class_name: String,

    /// The full path of the parent file.
    pub parent_file: Utf8PathBuf,

    /// The number of functions directly within this suite.
    pub function_count: usize,
}

/// A directory containing test files, or other directories that do.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestFolder {
    /// The path of this folder relative to the tests directory. The tests directory itself is
    /// named `.`.
    pub name: String,

    /// The absolute path to the folder.
    pub full_path: Utf8PathBuf,

    /// Test files directly within this folder, in discovery order.
    pub test_files: Vec<Utf8PathBuf>,

    /// Child folders, in discovery order.
    pub folders: Vec<Utf8PathBuf>,

    /// The execution status.
    pub status: TestStatus,
}

/// Counts of test results across a test tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestsSummary {
    /// The number of passed tests.
    pub passed: usize,

    /// The number of failed tests.
    pub failures: usize,

    /// The number of tests that errored out.
    pub errors: usize,

    /// The number of skipped tests.
    pub skipped: usize,
}

impl TestsSummary {
    /// Adds a single test status to the summary.
    pub fn record(&mut self, status: TestStatus) {
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failures += 1,
            TestStatus::Error => self.errors += 1,
            TestStatus::Skipped => self.skipped += 1,
            TestStatus::Idle | TestStatus::Running => {}
        }
    }
}

/// The flattened form of a discovered test tree.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlattenedTests {
    /// Summary counts.
    pub summary: TestsSummary,

    /// The test tree, in discovery order.
    pub test_files: Vec<TestFile>,

    /// Every test function in the tree.
    pub test_functions: Vec<FlattenedTestFunction>,

    /// Every test suite in the tree.
    pub test_suites: Vec<FlattenedTestSuite>,

    /// Every folder that contains a test file, directly or indirectly.
    pub test_folders: Vec<TestFolder>,

    /// Full paths of the folders that have no parent folder.
    pub root_test_folders: Vec<Utf8PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(TestStatus::Idle, "\"idle\"" ; "idle")]
    #[test_case(TestStatus::Passed, "\"passed\"" ; "passed")]
    #[test_case(TestStatus::Skipped, "\"skipped\"" ; "skipped")]
    fn status_serializes_lowercase(status: TestStatus, expected: &str) {
        assert_eq!(serde_json::to_string(&status).unwrap(), expected);
        assert_eq!(format!("\"{status}\""), expected);
    }

    #[test]
    fn status_variants_match_as_str() {
        let all = [
            TestStatus::Idle,
            TestStatus::Running,
            TestStatus::Passed,
            TestStatus::Failed,
            TestStatus::Error,
            TestStatus::Skipped,
        ];
        let names: Vec<_> = all.iter().map(|status| status.as_str()).collect();
        assert_eq!(names, TestStatus::variants());
    }

    #[test]
    fn summary_ignores_idle_and_running() {
        let mut summary = TestsSummary::default();
        for status in [
            TestStatus::Idle,
            TestStatus::Running,
            TestStatus::Passed,
            TestStatus::Passed,
            TestStatus::Failed,
            TestStatus::Error,
            TestStatus::Skipped,
        ] {
            summary.record(status);
        }
        assert_eq!(
            summary,
            TestsSummary {
                passed: 2,
                failures: 1,
                errors: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn new_file_takes_basename() {
        let file = TestFile::new("/repo/tests/test_foo.py", "TestFoo.test_bar");
        assert_eq!(file.name, "test_foo.py");
        assert_eq!(file.status, TestStatus::Idle);
        assert_eq!(file.function_count(), 0);
    }
}
