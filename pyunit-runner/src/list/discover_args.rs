// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::helpers::normalize_path;
use camino::{Utf8Path, Utf8PathBuf};

/// The start directory and file pattern passed to `unittest` discovery.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscoverArgs {
    /// The directory discovery starts from, relative to the root directory unless absolute.
    pub start_directory: String,

    /// The glob that test file names must match.
    pub pattern: String,
}

impl Default for DiscoverArgs {
    fn default() -> Self {
        Self {
            start_directory: Self::DEFAULT_START_DIRECTORY.to_owned(),
            pattern: Self::DEFAULT_PATTERN.to_owned(),
        }
    }
}

impl DiscoverArgs {
    /// The start directory used if none is specified.
    pub const DEFAULT_START_DIRECTORY: &'static str = ".";

    /// The file pattern used if none is specified.
    pub const DEFAULT_PATTERN: &'static str = "test*.py";

    /// Extracts `-s` (start directory) and `-p` (pattern) from a `unittest`-style argument list.
    ///
    /// Both `-s DIR` and `-sDIR` forms are accepted, with an optional `=` or space after the flag
    /// in the joined form. Only the first occurrence of each flag is used, and other arguments
    /// are ignored. Values are not validated.
    pub fn extract(argv: &[impl AsRef<str>]) -> Self {
        let mut args = Self::default();
        if let Some(start_directory) = extract_option(argv, "-s") {
            args.start_directory = start_directory;
        }
        if let Some(pattern) = extract_option(argv, "-p") {
            args.pattern = pattern;
        }
        args
    }

    /// Returns the directory test identifiers are relative to.
    ///
    /// A start directory of one character or less (such as the default `.`) means the root
    /// directory. Otherwise the start directory is used if absolute, or joined onto the root
    /// directory if relative.
    pub fn tests_directory(&self, root_dir: &Utf8Path) -> Utf8PathBuf {
        if self.start_directory.chars().count() > 1 {
            let start_directory = Utf8Path::new(&self.start_directory);
            if start_directory.is_absolute() {
                normalize_path(start_directory)
            } else {
                normalize_path(&root_dir.join(start_directory))
            }
        } else {
            normalize_path(root_dir)
        }
    }
}

fn extract_option(argv: &[impl AsRef<str>], flag: &str) -> Option<String> {
    let index = argv
        .iter()
        .position(|arg| arg.as_ref().starts_with(flag))?;
    let arg = argv[index].as_ref().trim();
    if arg == flag {
        // The value is the next argument.
        return argv.get(index + 1).map(|value| value.as_ref().to_owned());
    }

    let value = arg[flag.len()..].trim();
    let value = value
        .strip_prefix('=')
        .or_else(|| value.strip_prefix(' '))
        .unwrap_or(value);
    Some(value.to_owned())
}
