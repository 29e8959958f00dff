// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::WriteTestListError,
    helpers::write_test_name,
    list::{ListShape, OutputFormat, Styles},
};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use owo_colors::OwoColorize;
use pyunit_metadata::{TestFile, TestFunction, TestListSummary, TestSuite};
use std::io::{self, Write};
use tracing::trace;

/// A tree of discovered tests: files containing suites containing functions.
///
/// Files, suites and functions appear in the order they were first discovered.
#[derive(Clone, Debug, PartialEq)]
pub struct TestList {
    tests_dir: Utf8PathBuf,
    test_files: IndexMap<Utf8PathBuf, TestFile>,
    test_count: usize,
}

impl TestList {
    /// Builds a test list from dotted `unittest` identifiers such as `pkg.test_mod.TestA.test_one`.
    ///
    /// The last segment of each identifier is the function, the one before it is the class, and
    /// the rest is the module path, resolved to a `.py` file under `tests_dir`. Files are merged
    /// by path and suites by class name within a file. Every identifier adds a new function,
    /// even if the same identifier appeared earlier.
    ///
    /// Identifiers with fewer than three segments are skipped.
    pub fn from_test_ids<I>(tests_dir: impl Into<Utf8PathBuf>, test_ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut builder = TestListBuilder::new(tests_dir.into());
        for test_id in test_ids {
            builder.add_test_id(test_id.as_ref());
        }
        builder.finish()
    }

    /// Creates an empty test list.
    pub fn empty(tests_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            tests_dir: tests_dir.into(),
            test_files: IndexMap::new(),
            test_count: 0,
        }
    }

    /// Returns the directory that test file paths were resolved against.
    pub fn tests_dir(&self) -> &Utf8Path {
        &self.tests_dir
    }

    /// Returns the total number of test functions across all files.
    pub fn test_count(&self) -> usize {
        self.test_count
    }

    /// Returns the total number of suites across all files.
    pub fn suite_count(&self) -> usize {
        self.test_files.values().map(|file| file.suites.len()).sum()
    }

    /// Returns the number of files that contain tests.
    pub fn file_count(&self) -> usize {
        self.test_files.len()
    }

    /// Returns true if no tests were discovered.
    pub fn is_empty(&self) -> bool {
        self.test_files.is_empty()
    }

    /// Returns the file at the given full path, or `None` if it isn't in the list.
    pub fn get(&self, full_path: impl AsRef<Utf8Path>) -> Option<&TestFile> {
        self.test_files.get(full_path.as_ref())
    }

    /// Iterates over the test files in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &TestFile> + '_ {
        self.test_files.values()
    }

    /// Iterates over every test function along with its file and suite.
    pub fn iter_tests(&self) -> impl Iterator<Item = TestInstance<'_>> + '_ {
        self.test_files.values().flat_map(|file| {
            let in_suites = file.suites.iter().flat_map(move |suite| {
                suite.functions.iter().map(move |function| TestInstance {
                    file,
                    suite: Some(suite),
                    function,
                })
            });
            let module_level = file.functions.iter().map(move |function| TestInstance {
                file,
                suite: None,
                function,
            });
            in_suites.chain(module_level)
        })
    }

    /// Consumes the list, returning the test files in discovery order.
    pub fn into_test_files(self) -> Vec<TestFile> {
        self.test_files.into_values().collect()
    }

    /// Constructs a serializable summary for this test list.
    pub fn to_summary(&self) -> TestListSummary {
        TestListSummary {
            tests_dir: self.tests_dir.clone(),
            test_count: self.test_count,
            test_files: self.test_files.values().cloned().collect(),
        }
    }

    /// Outputs this list to the given writer.
    pub fn write(
        &self,
        output_format: OutputFormat,
        shape: ListShape,
        writer: impl Write,
        colorize: bool,
    ) -> Result<(), WriteTestListError> {
        match (output_format, shape) {
            (OutputFormat::Human { verbose }, ListShape::Tree) => self
                .write_human(writer, verbose, colorize)
                .map_err(WriteTestListError::Io),
            (OutputFormat::Human { .. }, ListShape::Flat) => self
                .write_human_flat(writer, colorize)
                .map_err(WriteTestListError::Io),
            (OutputFormat::Serializable(format), ListShape::Tree) => format
                .to_writer(&self.to_summary(), writer)
                .map_err(WriteTestListError::Json),
            (OutputFormat::Serializable(format), ListShape::Flat) => format
                .to_writer(&self.flatten(), writer)
                .map_err(WriteTestListError::Json),
        }
    }

    /// Outputs this list as a string with the given format.
    pub fn to_string(
        &self,
        output_format: OutputFormat,
        shape: ListShape,
    ) -> Result<String, WriteTestListError> {
        let mut buf = Vec::with_capacity(1024);
        self.write(output_format, shape, &mut buf, false)?;
        Ok(String::from_utf8(buf).expect("buffer is valid UTF-8"))
    }

    // ---
    // Helper methods
    // ---

    fn write_human(&self, mut writer: impl Write, verbose: bool, colorize: bool) -> io::Result<()> {
        let mut styles = Styles::default();
        if colorize {
            styles.colorize();
        }

        if self.test_files.is_empty() {
            writeln!(writer, "(no tests)")?;
            return Ok(());
        }

        for (full_path, file) in &self.test_files {
            let display_path = full_path
                .strip_prefix(&self.tests_dir)
                .unwrap_or(full_path.as_path());
            writeln!(writer, "{}:", display_path.style(styles.file_path))?;
            if verbose {
                writeln!(writer, "  {} {}", "path:".style(styles.field), full_path)?;
                writeln!(
                    writer,
                    "  {} {}",
                    "name to run:".style(styles.field),
                    file.name_to_run,
                )?;
            }

            for suite in &file.suites {
                write_suite(&mut writer, suite, 1, verbose, &styles)?;
            }
            for function in &file.functions {
                write_function(&mut writer, function, 1, verbose, &styles)?;
            }
        }
        Ok(())
    }

    fn write_human_flat(&self, mut writer: impl Write, colorize: bool) -> io::Result<()> {
        let mut styles = Styles::default();
        if colorize {
            styles.colorize();
        }

        for instance in self.iter_tests() {
            write_test_name(&instance.function.name_to_run, &styles, &mut writer)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}

const INDENT: &str = "    ";

fn write_suite(
    writer: &mut impl Write,
    suite: &TestSuite,
    depth: usize,
    verbose: bool,
    styles: &Styles,
) -> io::Result<()> {
    writeln!(
        writer,
        "{}{}",
        INDENT.repeat(depth),
        suite.name.style(styles.suite_name)
    )?;
    for function in &suite.functions {
        write_function(writer, function, depth + 1, verbose, styles)?;
    }
    for nested in &suite.suites {
        write_suite(writer, nested, depth + 1, verbose, styles)?;
    }
    Ok(())
}

fn write_function(
    writer: &mut impl Write,
    function: &TestFunction,
    depth: usize,
    verbose: bool,
    styles: &Styles,
) -> io::Result<()> {
    write!(writer, "{}", INDENT.repeat(depth))?;
    if verbose {
        write_test_name(&function.name_to_run, styles, &mut *writer)?;
    } else {
        write!(writer, "{}", function.name.style(styles.test_name))?;
    }
    writeln!(writer)
}

/// Represents a single test function along with its parents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TestInstance<'a> {
    /// The file the test is in.
    pub file: &'a TestFile,

    /// The suite the test is in, or `None` for module-level tests.
    pub suite: Option<&'a TestSuite>,

    /// The test function.
    pub function: &'a TestFunction,
}

/// Accumulates files and suites keyed by path and class name, preserving insertion order.
#[derive(Debug)]
struct TestListBuilder {
    tests_dir: Utf8PathBuf,
    files: IndexMap<Utf8PathBuf, FileBuilder>,
    test_count: usize,
}

#[derive(Debug)]
struct FileBuilder {
    file: TestFile,
    suites: IndexMap<String, TestSuite>,
}

impl TestListBuilder {
    fn new(tests_dir: Utf8PathBuf) -> Self {
        Self {
            tests_dir,
            files: IndexMap::new(),
            test_count: 0,
        }
    }

    fn add_test_id(&mut self, test_id: &str) {
        let parts: Vec<&str> = test_id.split('.').collect();
        let [module_path @ .., class_name, function_name] = parts.as_slice() else {
            trace!("skipping test id `{test_id}`: expected at least 3 dot-separated segments");
            return;
        };
        if module_path.is_empty() {
            trace!("skipping test id `{test_id}`: expected at least 3 dot-separated segments");
            return;
        }

        let full_path = self.file_path(module_path);
        let file = self
            .files
            .entry(full_path)
            .or_insert_with_key(|full_path| FileBuilder {
                file: TestFile::new(full_path.clone(), format!("{class_name}.{function_name}")),
                suites: IndexMap::new(),
            });
        let suite = file
            .suites
            .entry((*class_name).to_owned())
            .or_insert_with(|| TestSuite::new_unit_test(*class_name));
        suite
            .functions
            .push(TestFunction::new(*function_name, test_id));
        self.test_count += 1;
    }

    fn file_path(&self, module_path: &[&str]) -> Utf8PathBuf {
        let mut full_path = self.tests_dir.clone();
        // Empty segments (as in `pkg..TestA.test_one`) don't add a path component. Roots and
        // prefixes (as in `/abs.TestA.test_one`) are dropped so the path stays under tests_dir.
        for component in module_path
            .iter()
            .flat_map(|segment| Utf8Path::new(segment).components())
        {
            match component {
                Utf8Component::Prefix(_) | Utf8Component::RootDir => {}
                other => full_path.push(other),
            }
        }
        let mut full_path = full_path.into_string();
        full_path.push_str(".py");
        full_path.into()
    }

    fn finish(self) -> TestList {
        let test_files = self
            .files
            .into_iter()
            .map(|(full_path, builder)| {
                let FileBuilder { mut file, suites } = builder;
                file.suites = suites.into_values().collect();
                (full_path, file)
            })
            .collect();
        TestList {
            tests_dir: self.tests_dir,
            test_files,
            test_count: self.test_count,
        }
    }
}
