// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    errors::Result,
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pyunit_metadata::PyunitExitCode;
use pyunit_runner::{
    cancel::CancellationToken,
    discover::TestDiscoverer,
    errors::WriteTestListError,
    helpers::normalize_path,
    list::{ListShape, OutputFormat, SerializableFormat},
    signal::SignalHandlerKind,
    test_command::{CommandRunner, ProcessRunner},
    user_config::{UserConfig, UserConfigLocation},
};
use std::io::Write;
use tracing::warn;

/// Discover Python unittest tests.
///
/// Runs a small script under a Python interpreter to list the tests that
/// `python -m unittest discover` would find, and prints them as a tree of
/// files, suites and test functions.
#[derive(Debug, Parser)]
#[command(version, name = "pyunit-discover", styles = clap_styles::style())]
pub struct PyunitDiscoverApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(subcommand)]
    command: Command,
}

impl PyunitDiscoverApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::List(opts) => opts.exec(
                output,
                output_writer,
                &ProcessRunner,
                SignalHandlerKind::Standard,
            ),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tests under a project directory
    ///
    /// Arguments after `--` are scanned for `-s <start directory>` and
    /// `-p <pattern>`, as accepted by `python -m unittest discover`. If none
    /// are given, `[discovery] args` from the user config is used.
    List(ListOpts),
}

#[derive(Debug, Args)]
struct ListOpts {
    /// Project root directory [default: current directory]
    #[arg(long, value_name = "DIR")]
    root: Option<Utf8PathBuf>,

    /// Python interpreter used to run discovery
    #[arg(long, value_name = "PATH", env = "PYUNIT_PYTHON")]
    python: Option<String>,

    /// User config file, or `none` to use built-in defaults
    #[arg(long, value_name = "PATH", env = "PYUNIT_USER_CONFIG_FILE")]
    user_config_file: Option<String>,

    #[command(flatten)]
    message_format: MessageFormatOpts,

    /// Output the flattened form, with suites, functions and folders listed
    #[arg(long)]
    flat: bool,

    /// Arguments in `unittest discover` style
    #[arg(last = true, value_name = "ARGS")]
    discover_args: Vec<String>,
}

impl ListOpts {
    fn exec(
        self,
        output: OutputContext,
        output_writer: &mut OutputWriter,
        runner: &impl CommandRunner,
        signal_handler: SignalHandlerKind,
    ) -> Result<i32> {
        let root_dir = resolve_root_dir(self.root.as_deref())?;
        let user_config = UserConfig::from_location(UserConfigLocation::from_cli_or_env(
            self.user_config_file.as_deref(),
        ))?;
        let config = user_config
            .to_discovery_config()
            .with_python_override(self.python);
        let discoverer = TestDiscoverer::new(root_dir, self.discover_args.as_slice(), &config);

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|err| ExpectedError::TokioRuntimeCreateError { err })?;
        let cancel = CancellationToken::new();
        let test_list = runtime.block_on(async {
            let _signal_handler = signal_handler.install(&cancel);
            discoverer.discover(runner, &cancel).await
        })?;

        let format = self.message_format.to_output_format(output.verbose);
        let shape = if self.flat {
            ListShape::Flat
        } else {
            ListShape::Tree
        };
        let mut writer = output_writer.stdout_writer();
        test_list.write(
            format,
            shape,
            &mut writer,
            output.color.should_colorize(supports_color::Stream::Stdout),
        )?;
        writer.flush().map_err(WriteTestListError::Io)?;

        if test_list.is_empty() {
            warn!("no tests found under {}", test_list.tests_dir());
            Ok(PyunitExitCode::NO_TESTS_FOUND)
        } else {
            Ok(PyunitExitCode::OK)
        }
    }
}

fn resolve_root_dir(root: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    if let Some(root) = root
        && root.is_absolute()
    {
        return Ok(normalize_path(root));
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| ExpectedError::GetCurrentDirFailed { error })?;
    let current_dir = Utf8PathBuf::try_from(current_dir)
        .map_err(|error| ExpectedError::CurrentDirInvalidUtf8 { error })?;
    Ok(match root {
        Some(root) => normalize_path(&current_dir.join(root)),
        None => current_dir,
    })
}

#[derive(Debug, Args)]
struct MessageFormatOpts {
    /// Output format
    #[arg(long, value_enum, default_value_t, value_name = "FMT")]
    message_format: MessageFormat,
}

impl MessageFormatOpts {
    fn to_output_format(&self, verbose: bool) -> OutputFormat {
        match self.message_format {
            MessageFormat::Human => OutputFormat::Human { verbose },
            MessageFormat::Json => OutputFormat::Serializable(SerializableFormat::Json),
            MessageFormat::JsonPretty => OutputFormat::Serializable(SerializableFormat::JsonPretty),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
enum MessageFormat {
    /// A human-readable tree
    #[default]
    Human,
    /// JSON with no whitespace
    Json,
    /// JSON, prettified
    JsonPretty,
}
