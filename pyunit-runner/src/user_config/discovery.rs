// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::UserConfigError;
use camino::Utf8PathBuf;
use etcetera::{BaseStrategy, HomeDirError, base_strategy::Xdg};

const CONFIG_DIR_NAME: &str = "pyunit-discover";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns candidate paths for the user config file, in order of priority.
///
/// The caller should use the first path that exists.
pub fn user_config_paths() -> Result<Vec<Utf8PathBuf>, UserConfigError> {
    let mut paths = Vec::new();

    #[cfg(windows)]
    if let Some(path) = native_config_path()? {
        paths.push(path);
    }

    if let Some(path) = xdg_config_path()? {
        paths.push(path);
    }

    Ok(paths)
}

fn xdg_config_path() -> Result<Option<Utf8PathBuf>, UserConfigError> {
    let strategy = match Xdg::new() {
        Ok(strategy) => strategy,
        Err(HomeDirError) => return Ok(None),
    };

    let config_path = strategy
        .config_dir()
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME);
    Utf8PathBuf::try_from(config_path)
        .map(Some)
        .map_err(|error| UserConfigError::NonUtf8Path { error })
}

#[cfg(windows)]
fn native_config_path() -> Result<Option<Utf8PathBuf>, UserConfigError> {
    use etcetera::base_strategy::Windows;

    let strategy = match Windows::new() {
        Ok(strategy) => strategy,
        Err(HomeDirError) => return Ok(None),
    };

    let config_path = strategy
        .config_dir()
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME);
    Utf8PathBuf::try_from(config_path)
        .map(Some)
        .map_err(|error| UserConfigError::NonUtf8Path { error })
}
