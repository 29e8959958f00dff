// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-specific configuration for pyunit-discover.
//!
//! ## Config file location
//!
//! - **Unix/macOS**: `$XDG_CONFIG_HOME/pyunit-discover/config.toml` or
//!   `~/.config/pyunit-discover/config.toml`
//! - **Windows**: `%APPDATA%\pyunit-discover\config.toml`, with fallback to
//!   `~/.config/pyunit-discover/config.toml`
//!
//! ## Configuration hierarchy
//!
//! The interpreter path is resolved in the following order (highest priority first):
//!
//! 1. The `--python` CLI argument
//! 2. The `PYUNIT_PYTHON` environment variable
//! 3. `[python] path` in the user config
//! 4. The built-in default, `python`
//!
//! Discovery arguments passed on the command line replace `[discovery] args` entirely.

mod discovery;
mod imp;

pub use discovery::*;
pub use imp::*;
