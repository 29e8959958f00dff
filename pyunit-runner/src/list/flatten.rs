// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{helpers::module_name, list::TestList};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use pyunit_metadata::{
    FlattenedTestFunction, FlattenedTestSuite, FlattenedTests, TestFile, TestFolder, TestFunction,
    TestStatus, TestSuite, TestsSummary,
};

impl TestList {
    /// Produces the flattened form of this list, with every suite, function and folder listed
    /// alongside the tree.
    ///
    /// Folders are derived from file paths: every directory between the tests directory and a
    /// test file gets an entry.
    pub fn flatten(&self) -> FlattenedTests {
        let mut flattener = Flattener::new(self.tests_dir());
        for file in self.iter() {
            flattener.add_file(file);
        }
        flattener.finish(self.iter().cloned().collect())
    }
}

struct Flattener<'a> {
    tests_dir: &'a Utf8Path,
    summary: TestsSummary,
    test_functions: Vec<FlattenedTestFunction>,
    test_suites: Vec<FlattenedTestSuite>,
    folders: IndexMap<Utf8PathBuf, TestFolder>,
}

impl<'a> Flattener<'a> {
    fn new(tests_dir: &'a Utf8Path) -> Self {
        Self {
            tests_dir,
            summary: TestsSummary::default(),
            test_functions: Vec::new(),
            test_suites: Vec::new(),
            folders: IndexMap::new(),
        }
    }

    fn add_file(&mut self, file: &TestFile) {
        let module = module_name(self.tests_dir, &file.full_path);
        for suite in &file.suites {
            self.add_suite(file, suite, &module);
        }
        for function in &file.functions {
            self.add_function(file, None, function, &module);
        }
        self.add_folders(&file.full_path);
    }

    fn add_suite(&mut self, file: &TestFile, suite: &TestSuite, class_prefix: &str) {
        let xml_class_name = format!("{class_prefix}.{}", suite.name_to_run);
        self.test_suites.push(FlattenedTestSuite {
            name_to_run: suite.name_to_run.clone(),
            xml_class_name: xml_class_name.clone(),
            parent_file: file.full_path.clone(),
            function_count: suite.functions.len(),
        });
        for function in &suite.functions {
            self.add_function(file, Some(suite), function, &xml_class_name);
        }
        for nested in &suite.suites {
            self.add_suite(file, nested, &xml_class_name);
        }
    }

    fn add_function(
        &mut self,
        file: &TestFile,
        suite: Option<&TestSuite>,
        function: &TestFunction,
        fallback_class_name: &str,
    ) {
        let xml_class_name = match function.name_to_run.rsplit_once('.') {
            Some((class_name, _)) => class_name.to_owned(),
            None => fallback_class_name.to_owned(),
        };
        self.summary.record(function.status);
        self.test_functions.push(FlattenedTestFunction {
            name_to_run: function.name_to_run.clone(),
            xml_class_name,
            parent_suite: suite.map(|suite| suite.name_to_run.clone()),
            parent_file: file.full_path.clone(),
            status: function.status,
        });
    }

    fn add_folders(&mut self, file_path: &Utf8Path) {
        let Some(dir) = file_path.parent() else {
            return;
        };

        // Walk from the tests directory down to the file's directory. Files outside the tests
        // directory get a single folder for their own directory.
        let mut chain: Vec<&Utf8Path> = dir
            .ancestors()
            .take_while(|ancestor| ancestor.starts_with(self.tests_dir))
            .collect();
        if chain.is_empty() {
            chain.push(dir);
        }
        chain.reverse();

        let mut parent: Option<&Utf8Path> = None;
        for folder_path in chain {
            self.folder_mut(folder_path);
            if let Some(parent) = parent {
                let parent_folder = self.folder_mut(parent);
                if !parent_folder.folders.iter().any(|child| child == folder_path) {
                    parent_folder.folders.push(folder_path.to_owned());
                }
            }
            parent = Some(folder_path);
        }

        self.folder_mut(dir).test_files.push(file_path.to_owned());
    }

    fn folder_mut(&mut self, full_path: &Utf8Path) -> &mut TestFolder {
        let tests_dir = self.tests_dir;
        self.folders
            .entry(full_path.to_owned())
            .or_insert_with(|| TestFolder {
                name: folder_name(tests_dir, full_path),
                full_path: full_path.to_owned(),
                test_files: Vec::new(),
                folders: Vec::new(),
                status: TestStatus::Idle,
            })
    }

    fn finish(self, test_files: Vec<TestFile>) -> FlattenedTests {
        let root_test_folders = self
            .folders
            .keys()
            .filter(|full_path| {
                full_path
                    .parent()
                    .is_none_or(|parent| !self.folders.contains_key(parent))
            })
            .cloned()
            .collect();

        FlattenedTests {
            summary: self.summary,
            test_files,
            test_functions: self.test_functions,
            test_suites: self.test_suites,
            test_folders: self.folders.into_values().collect(),
            root_test_folders,
        }
    }
}

fn folder_name(tests_dir: &Utf8Path, full_path: &Utf8Path) -> String {
    match full_path.strip_prefix(tests_dir) {
        Ok(relative) if relative.as_str().is_empty() => ".".to_owned(),
        Ok(relative) => relative.to_string(),
        Err(_) => full_path.to_string(),
    }
}
