// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Machine-readable data model for
//! [pyunit-discover](https://crates.io/crates/pyunit-discover).
//!
//! The test tree produced by discovery is made of [`TestFile`], [`TestSuite`] and
//! [`TestFunction`] nodes. [`FlattenedTests`] is the flat, cross-referenced form of the same
//! tree, produced by `pyunit-runner`'s flattening pass.

mod exit_codes;
mod test_list;

pub use exit_codes::*;
pub use test_list::*;
