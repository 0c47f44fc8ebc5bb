//! CLI entry point for jsonstream.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use jsonstream_core::{StreamConfig, StreamEvent, StreamRequest};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

mod app_config;
mod cli;
mod config_runtime;

use cli::Args;
use config_runtime::{apply_config_defaults, parse_cli_with_sources, resolve_default_log_level};

/// Output line for `--include-headers`.
#[derive(Serialize)]
struct HeaderedMessage<'a> {
    headers: &'a Value,
    data: &'a Value,
}

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let (args, cli_sources) = parse_cli_with_sources();
    let file_config = app_config::load_file_config(args.config.as_deref())?;

    // Priority: RUST_LOG env var > -q > -v > config verbosity > info
    let default_level = resolve_default_log_level(&args, &cli_sources, file_config.as_ref());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = apply_config_defaults(args, &cli_sources, file_config.as_ref());
    debug!(?args, "CLI arguments resolved");

    run(&args)
}

fn build_request(args: &Args) -> StreamRequest {
    let mut request = StreamRequest::new(args.method.into(), args.url.clone())
        .connect_timeout(Duration::from_secs(args.connect_timeout));
    for (name, value) in &args.params {
        request = request.param(name, value);
    }
    for (name, value) in &args.headers {
        request = request.header(name, value);
    }
    request
}

fn stream_config(args: &Args) -> StreamConfig {
    if args.non_blocking {
        StreamConfig::non_blocking()
    } else {
        StreamConfig::with_timeout(Duration::from_secs(args.timeout))
    }
}

fn run(args: &Args) -> Result<()> {
    let request = build_request(args);
    let stream = jsonstream_core::open(&request, stream_config(args))
        .with_context(|| format!("Failed to open stream {}", request.uri()))?;
    info!(uri = %stream.uri(), mode = ?stream.mode(), "streaming");

    let headers = args.include_headers.then(|| stream.headers().to_json());
    let mut out = io::stdout().lock();
    let mut messages: u64 = 0;

    for event in stream {
        let event = event.context("Stream failed")?;
        match &event {
            StreamEvent::Message(message) => {
                match &headers {
                    Some(headers) => write_line(
                        &mut out,
                        &HeaderedMessage {
                            headers,
                            data: message.value(),
                        },
                    )?,
                    None => write_line(&mut out, message.value())?,
                }
                messages += 1;
                if args.max_events.is_some_and(|max| messages >= max) {
                    info!(messages, "message limit reached");
                    break;
                }
            }
            StreamEvent::Timeout | StreamEvent::Hangup => write_line(&mut out, &event.to_json())?,
            StreamEvent::NoData => thread::sleep(Duration::from_millis(args.poll_interval_ms)),
        }
    }

    info!(messages, "stream finished");
    Ok(())
}

fn write_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value).context("Failed to encode output line")?;
    out.write_all(b"\n")
        .and_then(|()| out.flush())
        .context("Failed to write output")
}
