// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Support for building and querying lists of discovered tests.
//!
//! The discovery script prints one dotted identifier per test after a sentinel line.
//! [`scan_test_ids`] pulls those identifiers out of the script's output, and
//! [`TestList::from_test_ids`] arranges them into files, suites and functions.

mod discover_args;
mod flatten;
mod output_format;
mod scanner;
mod test_list;

pub use discover_args::*;
pub(crate) use output_format::Styles;
pub use output_format::{ListShape, OutputFormat, SerializableFormat};
pub use scanner::*;
pub use test_list::*;
