// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for pyunit-runner.

use crate::list::Styles;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use owo_colors::OwoColorize;
use std::io;

/// Utilities for pluralizing various words based on count or plurality.
pub mod plural {
    /// Returns "test" if `count` is 1, otherwise "tests".
    pub fn tests_str(count: usize) -> &'static str {
        if count == 1 { "test" } else { "tests" }
    }

    /// Returns "suite" if `count` is 1, otherwise "suites".
    pub fn suites_str(count: usize) -> &'static str {
        if count == 1 { "suite" } else { "suites" }
    }

    /// Returns "file" if `count` is 1, otherwise "files".
    pub fn files_str(count: usize) -> &'static str {
        if count == 1 { "file" } else { "files" }
    }
}

/// Lexically normalizes a path, removing `.` components and resolving `..` against preceding
/// components. The file system is not consulted.
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match normalized.components().next_back() {
                Some(Utf8Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` at the root stays at the root.
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_str()),
        }
    }
    if normalized.as_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Returns the dotted Python module name for `file` relative to `base`, e.g. `pkg.test_mod` for
/// `base/pkg/test_mod.py`.
///
/// Returns the file stem if `file` isn't within `base`.
pub(crate) fn module_name(base: &Utf8Path, file: &Utf8Path) -> String {
    match file.strip_prefix(base) {
        Ok(relative) => {
            let relative = relative.with_extension("");
            relative
                .components()
                .map(|component| component.as_str())
                .collect::<Vec<_>>()
                .join(".")
        }
        Err(_) => file.file_stem().unwrap_or_default().to_owned(),
    }
}

/// Writes a dotted test identifier, styling the module path and the test name separately.
pub(crate) fn write_test_name(
    name: &str,
    styles: &Styles,
    mut writer: impl io::Write,
) -> io::Result<()> {
    match name.rsplit_once('.') {
        Some((module_path, test_name)) => write!(
            writer,
            "{}{}{}",
            module_path.style(styles.module_path),
            ".".style(styles.module_path),
            test_name.style(styles.test_name),
        ),
        None => write!(writer, "{}", name.style(styles.test_name)),
    }
}
