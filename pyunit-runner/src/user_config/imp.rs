// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::discovery::user_config_paths;
use crate::errors::UserConfigError;
use camino::Utf8Path;
use serde::Deserialize;
use std::{collections::BTreeSet, io};
use swrite::{SWrite, swrite};
use tracing::{debug, warn};

/// Special value for `--user-config-file` and `PYUNIT_USER_CONFIG_FILE` that skips user config
/// loading entirely.
pub const USER_CONFIG_NONE: &str = "none";

/// Specifies where to load user configuration from.
#[derive(Clone, Copy, Debug)]
pub enum UserConfigLocation<'a> {
    /// Discover user config from default locations (e.g.
    /// `~/.config/pyunit-discover/config.toml`).
    Default,

    /// Skip user config loading entirely, using only built-in defaults.
    Isolated,

    /// Load user config from an explicit path. The file must exist.
    Explicit(&'a Utf8Path),
}

impl<'a> UserConfigLocation<'a> {
    /// Creates a user config location from a CLI or environment variable value.
    ///
    /// Returns `Default` if `None`, `Isolated` if `"none"`, otherwise `Explicit` with the path.
    pub fn from_cli_or_env(s: Option<&'a str>) -> Self {
        match s {
            None => Self::Default,
            Some(USER_CONFIG_NONE) => Self::Isolated,
            Some(s) => Self::Explicit(Utf8Path::new(s)),
        }
    }
}

/// User configuration with defaults applied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserConfig {
    /// Interpreter settings.
    pub python: PythonConfig,

    /// Discovery settings.
    pub discovery: DiscoverySettings,
}

/// The `[python]` section of the user config.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PythonConfig {
    /// The interpreter used to run the discovery script.
    pub path: String,
}

/// The `[discovery]` section of the user config.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscoverySettings {
    /// Arguments scanned for `-s` and `-p` when none are passed on the command line.
    pub args: Vec<String>,
}

impl UserConfig {
    /// Loads user config from the given location, falling back to built-in defaults for
    /// anything that isn't set.
    ///
    /// Unknown keys are logged as warnings.
    pub fn from_location(location: UserConfigLocation<'_>) -> Result<Self, UserConfigError> {
        Self::from_location_with_warnings(location, &mut DefaultUserConfigWarnings)
    }

    fn from_location_with_warnings(
        location: UserConfigLocation<'_>,
        warnings: &mut impl UserConfigWarnings,
    ) -> Result<Self, UserConfigError> {
        let default_config = DefaultUserConfig::from_embedded();
        let user_config = DeserializedUserConfig::from_location_with_warnings(location, warnings)?;
        Ok(Self::resolve(default_config, user_config))
    }

    fn resolve(
        default_config: DefaultUserConfig,
        user_config: Option<DeserializedUserConfig>,
    ) -> Self {
        let DefaultUserConfig { python, discovery } = default_config;
        let Some(user_config) = user_config else {
            return Self { python, discovery };
        };

        Self {
            python: PythonConfig {
                path: user_config.python.path.unwrap_or(python.path),
            },
            discovery: DiscoverySettings {
                args: user_config.discovery.args.unwrap_or(discovery.args),
            },
        }
    }

    /// Converts this config into the settings used by a discoverer.
    pub fn to_discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            python_path: self.python.path.clone(),
            default_args: self.discovery.args.clone(),
        }
    }
}

/// Settings that control how tests are discovered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscoveryConfig {
    /// The interpreter used to run the discovery script.
    pub python_path: String,

    /// Arguments used when none are passed explicitly.
    pub default_args: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DefaultUserConfig::from_embedded().to_user_config().to_discovery_config()
    }
}

impl DiscoveryConfig {
    /// Replaces the interpreter path if `python_path` is `Some`.
    pub fn with_python_override(mut self, python_path: Option<String>) -> Self {
        if let Some(python_path) = python_path {
            debug!("python path overridden to `{python_path}`");
            self.python_path = python_path;
        }
        self
    }
}

/// Receives warnings produced while loading user config.
trait UserConfigWarnings {
    /// Called with the unknown keys found in a user config file.
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

/// Logs warnings via `tracing`.
struct DefaultUserConfigWarnings;

impl UserConfigWarnings for DefaultUserConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let mut unknown_str = String::new();
        if let [single] = unknown.iter().collect::<Vec<_>>().as_slice() {
            // Print this on the same line.
            swrite!(unknown_str, "key: {single}");
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                swrite!(unknown_str, "\n  - {ignored_key}");
            }
        }

        warn!("in user config file {config_file}, ignoring unknown configuration {unknown_str}");
    }
}

/// User config as read from disk. Every setting is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedUserConfig {
    #[serde(default)]
    python: DeserializedPythonConfig,

    #[serde(default)]
    discovery: DeserializedDiscoveryConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedPythonConfig {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedDiscoveryConfig {
    #[serde(default)]
    args: Option<Vec<String>>,
}

impl DeserializedUserConfig {
    fn from_location_with_warnings(
        location: UserConfigLocation<'_>,
        warnings: &mut impl UserConfigWarnings,
    ) -> Result<Option<Self>, UserConfigError> {
        match location {
            UserConfigLocation::Isolated => {
                debug!("user config: skipping (isolated)");
                Ok(None)
            }
            UserConfigLocation::Explicit(path) => {
                debug!("user config: loading from explicit path {path}");
                match Self::from_path_with_warnings(path, warnings)? {
                    Some(config) => Ok(Some(config)),
                    None => Err(UserConfigError::FileNotFound {
                        path: path.to_owned(),
                    }),
                }
            }
            UserConfigLocation::Default => {
                let paths = user_config_paths()?;
                for path in &paths {
                    if let Some(config) = Self::from_path_with_warnings(path, warnings)? {
                        return Ok(Some(config));
                    }
                }
                debug!("user config: no config file found at any candidate path: {paths:?}");
                Ok(None)
            }
        }
    }

    /// Returns `Ok(None)` if the file does not exist.
    fn from_path_with_warnings(
        path: &Utf8Path,
        warnings: &mut impl UserConfigWarnings,
    ) -> Result<Option<Self>, UserConfigError> {
        debug!("user config: attempting to load from {path}");
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("user config: file does not exist at {path}");
                return Ok(None);
            }
            Err(error) => {
                return Err(UserConfigError::Read {
                    path: path.to_owned(),
                    error,
                });
            }
        };

        let (config, unknown) =
            Self::deserialize_toml(&contents).map_err(|error| UserConfigError::Parse {
                path: path.to_owned(),
                error,
            })?;
        if !unknown.is_empty() {
            warnings.unknown_config_keys(path, &unknown);
        }

        debug!("user config: loaded successfully from {path}");
        Ok(Some(config))
    }

    fn deserialize_toml(contents: &str) -> Result<(Self, BTreeSet<String>), toml::de::Error> {
        let deserializer = toml::Deserializer::parse(contents)?;
        let mut unknown = BTreeSet::new();
        let config: DeserializedUserConfig = serde_ignored::deserialize(deserializer, |path| {
            unknown.insert(path.to_string());
        })?;
        Ok((config, unknown))
    }
}

/// The built-in defaults, with every setting required.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultUserConfig {
    python: PythonConfig,
    discovery: DiscoverySettings,
}

impl DefaultUserConfig {
    const DEFAULT_CONFIG: &'static str = include_str!("../../default-user-config.toml");

    /// Panics if the embedded TOML is invalid or contains unknown keys.
    fn from_embedded() -> Self {
        let deserializer = toml::Deserializer::parse(Self::DEFAULT_CONFIG)
            .expect("embedded default user config should parse");
        let mut unknown = BTreeSet::new();
        let config: DefaultUserConfig =
            serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
                unknown.insert(path.to_string());
            })
            .expect("embedded default user config should be valid");

        if !unknown.is_empty() {
            panic!(
                "found unknown keys in default user config: {}",
                unknown.into_iter().collect::<Vec<_>>().join(", ")
            );
        }
        config
    }

    fn to_user_config(&self) -> UserConfig {
        UserConfig {
            python: self.python.clone(),
            discovery: self.discovery.clone(),
        }
    }
}
