// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::{Args, ValueEnum};
use owo_colors::{OwoColorize, Style, style};
use std::{
    env::VarError,
    fmt,
    io::{self, BufWriter, Write},
    sync::Once,
};
use tracing::{Event, Level, Subscriber, level_filters::LevelFilter, warn};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Events logged to this target are printed without a level heading.
pub(crate) const NO_HEADING_TARGET: &str = "pyunit_discover::no_heading";

const LOG_ENV: &str = "PYUNIT_LOG";

pub(crate) mod clap_styles {
    use clap::builder::{
        Styles,
        styling::{AnsiColor, Effects},
    };

    pub(crate) const fn style() -> Styles {
        Styles::styled()
            .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
            .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
            .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
            .placeholder(AnsiColor::Cyan.on_default())
            .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
    }
}

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Verbose output
    #[arg(long, short, global = true, env = "PYUNIT_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        global = true,
        value_name = "WHEN",
        env = "PYUNIT_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    /// Resolves the output context and sets up logging to stderr.
    pub(crate) fn init(self) -> OutputContext {
        init_logger(self.color.should_colorize(supports_color::Stream::Stderr));
        OutputContext {
            verbose: self.verbose,
            color: self.color,
        }
    }
}

/// Output settings resolved from the command line.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) verbose: bool,
    pub(crate) color: Color,
}

impl OutputContext {
    /// Returns styles for error messages printed to stderr.
    pub fn stderr_styles(&self) -> StderrStyles {
        if self.color.should_colorize(supports_color::Stream::Stderr) {
            StderrStyles {
                bold: style().bold(),
            }
        } else {
            StderrStyles::default()
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub(crate) enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Color {
    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

fn init_logger(colorize: bool) {
    static INIT_LOGGER: Once = Once::new();

    INIT_LOGGER.call_once(|| {
        let (targets, rejected) = log_targets(std::env::var(LOG_ENV));
        let layer = tracing_subscriber::fmt::layer()
            .event_format(HeadingFormatter { colorize })
            .with_writer(io::stderr)
            .with_filter(targets);
        tracing_subscriber::registry().with(layer).init();

        if let Some(rejected) = rejected {
            warn!("{rejected}, logging at the default level");
        }
    });
}

/// Parses the log filter from the environment.
///
/// An unset or empty value means `info`. An unusable value also means `info`, and the reason is
/// returned so it can be logged once the subscriber is up.
fn log_targets(value: Result<String, VarError>) -> (Targets, Option<String>) {
    let default_targets = Targets::new().with_default(LevelFilter::INFO);
    match value {
        Err(VarError::NotPresent) => (default_targets, None),
        Err(VarError::NotUnicode(_)) => (
            default_targets,
            Some(format!("{LOG_ENV} is not valid UTF-8")),
        ),
        Ok(value) if value.trim().is_empty() => (default_targets, None),
        Ok(value) => match value.parse::<Targets>() {
            Ok(targets) => (targets, None),
            Err(error) => (
                default_targets,
                Some(format!("{LOG_ENV}=`{value}` is not a valid filter ({error})")),
            ),
        },
    }
}

/// Formats events as `<level>: <message>`, or just `<message>` for [`NO_HEADING_TARGET`].
struct HeadingFormatter {
    colorize: bool,
}

impl HeadingFormatter {
    fn heading(&self, level: Level) -> (&'static str, Style) {
        let (heading, heading_style) = match level {
            Level::ERROR => ("error", style().red().bold()),
            Level::WARN => ("warning", style().yellow().bold()),
            Level::INFO => ("info", style().bold()),
            Level::DEBUG => ("debug", style().bold()),
            Level::TRACE => ("trace", style().dimmed()),
        };
        if self.colorize {
            (heading, heading_style)
        } else {
            (heading, Style::new())
        }
    }
}

impl<S, N> FormatEvent<S, N> for HeadingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        if metadata.target() != NO_HEADING_TARGET {
            let (heading, heading_style) = self.heading(*metadata.level());
            write!(writer, "{}: ", heading.style(heading_style))?;
        }
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Styles for messages printed to stderr.
#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
}

/// Where list output is written.
#[derive(Default)]
pub enum OutputWriter {
    /// Buffered stdout.
    #[default]
    Normal,

    /// Output captured.
    #[cfg(test)]
    Test {
        /// stdout capture
        stdout: Vec<u8>,
    },
}

impl OutputWriter {
    pub(crate) fn stdout_writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Self::Normal => Box::new(BufWriter::new(io::stdout())),
            #[cfg(test)]
            Self::Test { stdout } => Box::new(stdout),
        }
    }
}
