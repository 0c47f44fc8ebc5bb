//! Merging config file defaults under explicit command-line values.

use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};

use crate::app_config::FileConfig;
use crate::cli::Args;

/// Which arguments were given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) non_blocking: bool,
    pub(crate) timeout: bool,
    pub(crate) connect_timeout: bool,
    pub(crate) poll_interval_ms: bool,
    pub(crate) include_headers: bool,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    let sources = value_sources(&matches);
    (args, sources)
}

fn value_sources(matches: &ArgMatches) -> CliValueSources {
    CliValueSources {
        non_blocking: is_commandline_value(matches, "non_blocking"),
        timeout: is_commandline_value(matches, "timeout"),
        connect_timeout: is_commandline_value(matches, "connect_timeout"),
        poll_interval_ms: is_commandline_value(matches, "poll_interval_ms"),
        include_headers: is_commandline_value(matches, "include_headers"),
        verbose: is_commandline_value(matches, "verbose"),
        quiet: is_commandline_value(matches, "quiet"),
    }
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Fills every argument not given on the command line from the file config.
pub(crate) fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Args {
    let Some(file_config) = file_config else {
        return args;
    };

    if !cli_sources.non_blocking
        && let Some(blocking) = file_config.blocking
    {
        args.non_blocking = !blocking;
    }
    if !cli_sources.timeout
        && let Some(timeout) = file_config.timeout_secs
    {
        args.timeout = timeout;
    }
    if !cli_sources.connect_timeout
        && let Some(timeout) = file_config.connect_timeout_secs
    {
        args.connect_timeout = timeout;
    }
    if !cli_sources.poll_interval_ms
        && let Some(interval) = file_config.poll_interval_ms
    {
        args.poll_interval_ms = interval;
    }
    if !cli_sources.include_headers
        && let Some(include_headers) = file_config.include_headers
    {
        args.include_headers = include_headers;
    }
    args
}

/// Default log filter when `RUST_LOG` is unset.
///
/// Priority: `-q` > `-v` count > config `verbosity` > info.
pub(crate) fn resolve_default_log_level(
    args: &Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> &'static str {
    if args.quiet {
        return "error";
    }
    if cli_sources.verbose {
        return match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
    }
    file_config
        .and_then(|cfg| cfg.verbosity)
        .map_or("info", |verbosity| verbosity.filter())
}
