//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use jsonstream_core::Method;
use jsonstream_core::http::CONNECT_TIMEOUT_SECS;

/// Default sleep between polls in non-blocking mode.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Print the JSON documents of a chunked HTTP stream, one per line.
///
/// Each decoded value is written to stdout as a single JSON line. Idle
/// timeouts are reported as `{"timeout":true}` and the end of the stream as
/// `{"hangup":true}`. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "jsonstream")]
#[command(author, version, about)]
pub struct Args {
    /// Streaming endpoint (plain http)
    pub url: String,

    /// Request method
    #[arg(short = 'X', long, value_enum, default_value_t = MethodArg::Get)]
    pub method: MethodArg,

    /// Request parameter as KEY=VALUE (query string for GET, form body for POST)
    #[arg(short = 'd', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Extra request header as "Name: value"
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Poll without blocking; sleeps --poll-interval-ms between empty polls
    #[arg(long)]
    pub non_blocking: bool,

    /// Idle timeout in seconds before a timeout event (0 waits forever, max 86400)
    #[arg(short = 't', long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=86_400))]
    pub timeout: u64,

    /// Connect and response-head timeout in seconds (1-3600)
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// Sleep between empty polls in non-blocking mode, in milliseconds (max 60000)
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS, value_parser = clap::value_parser!(u64).range(0..=60_000))]
    pub poll_interval_ms: u64,

    /// Stop after this many messages
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_events: Option<u64>,

    /// Wrap each message as {"headers": ..., "data": ...}
    #[arg(long)]
    pub include_headers: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/jsonstream/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Request method accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Get,
    Post,
}

impl From<MethodArg> for Method {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Get => Self::Get,
            MethodArg::Post => Self::Post,
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:8080/1.1/statuses/sample.json";

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["jsonstream", URL]).unwrap();
        assert_eq!(args.url, URL);
        assert_eq!(args.method, MethodArg::Get);
        assert!(args.params.is_empty());
        assert!(!args.non_blocking);
        assert_eq!(args.timeout, 0);
        assert_eq!(args.connect_timeout, CONNECT_TIMEOUT_SECS);
        assert_eq!(args.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(args.max_events, None);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_url_is_required() {
        let err = Args::try_parse_from(["jsonstream"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["jsonstream", URL, "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_method_post() {
        let args = Args::try_parse_from(["jsonstream", URL, "--method", "post"]).unwrap();
        assert_eq!(Method::from(args.method), Method::Post);
    }

    #[test]
    fn test_cli_params_and_headers() {
        let args = Args::try_parse_from([
            "jsonstream",
            URL,
            "-d",
            "track=rust,tokio",
            "--param",
            "delimited=length",
            "-H",
            "Authorization: Bearer abc",
        ])
        .unwrap();
        assert_eq!(
            args.params,
            vec![
                ("track".to_string(), "rust,tokio".to_string()),
                ("delimited".to_string(), "length".to_string()),
            ]
        );
        assert_eq!(
            args.headers,
            vec![("Authorization".to_string(), "Bearer abc".to_string())]
        );
    }

    #[test]
    fn test_cli_param_without_equals_is_rejected() {
        let err = Args::try_parse_from(["jsonstream", URL, "-d", "track"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_header_without_colon_is_rejected() {
        let err = Args::try_parse_from(["jsonstream", URL, "-H", "Broken"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_timeout_range() {
        let args = Args::try_parse_from(["jsonstream", URL, "-t", "90"]).unwrap();
        assert_eq!(args.timeout, 90);

        let result = Args::try_parse_from(["jsonstream", URL, "-t", "86401"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_connect_timeout_zero_rejected() {
        let result = Args::try_parse_from(["jsonstream", URL, "--connect-timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_max_events_must_be_positive() {
        let args = Args::try_parse_from(["jsonstream", URL, "-n", "5"]).unwrap();
        assert_eq!(args.max_events, Some(5));

        let result = Args::try_parse_from(["jsonstream", URL, "-n", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["jsonstream", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["jsonstream", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
