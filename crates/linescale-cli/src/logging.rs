use crate::cli::Cli;
use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::{Layer, filter::LevelFilter, fmt, prelude::*, registry::LookupSpan};

/// Where log records go and how many of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogSettings<'a> {
    pub level: LevelFilter,
    pub file: Option<&'a Path>,
}

impl<'a> LogSettings<'a> {
    pub fn from_cli(cli: &'a Cli) -> Self {
        Self {
            level: level_filter(cli.verbose, cli.quiet),
            file: cli.log_file.as_deref(),
        }
    }
}

/// `--quiet` keeps errors; each `-v` opens one more level above the WARN default.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbosity) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
}

/// Plain-text layer for `--log-file`; it keeps targets and thread ids so
/// records from the rayon workers can be told apart.
fn file_layer<S>(path: &Path) -> Result<impl Layer<S>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let file = File::create(path).map_err(CliError::Io)?;
    Ok(fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true))
}

pub fn init(settings: LogSettings) -> Result<()> {
    let file = settings.file.map(file_layer).transpose()?;
    tracing_subscriber::registry()
        .with(settings.level)
        .with(console_layer())
        .with(file)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}
