// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discover Python `unittest` tests and print them as a file → suite → function tree.
//!
//! ```text
//! pyunit-discover list --root path/to/project -- -s tests -p "test_*.py"
//! ```
//!
//! Set `PYUNIT_LOG` to a `tracing` filter such as `debug` or `pyunit_runner=trace` for more
//! detailed logs.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter, StderrStyles};
