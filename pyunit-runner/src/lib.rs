// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [pyunit-discover](https://crates.io/crates/pyunit-discover).
//!
//! Discovery runs a short script under a Python interpreter, scans its output for `unittest`
//! test identifiers, and assembles them into a file → suite → function tree:
//!
//! 1. [`list::DiscoverArgs`] extracts the start directory and file pattern from an argument list.
//! 2. [`script::DiscoveryScript`] renders the discovery script.
//! 3. A [`test_command::CommandRunner`] runs the interpreter and captures its output.
//! 4. [`list::scan_test_ids`] extracts identifiers from that output.
//! 5. [`list::TestList::from_test_ids`] builds the tree.
//!
//! [`discover::TestDiscoverer`] ties these steps together.

pub mod cancel;
pub mod discover;
pub mod errors;
pub mod helpers;
pub mod list;
pub mod script;
pub mod signal;
pub mod test_command;
pub mod user_config;
