//! Tracing setup for the mapwidgets binary
//!
//! The terminal UI owns stdout and the alternate screen, so while it runs
//! events go to a log file or nowhere. Commands that stay on the normal
//! terminal log to stderr.
//!
//! Usage:
//!   mapwidgets --debug --log-file /tmp/mw.log   # Debug logging to a file
//!   RUST_LOG=mapwidgets_core=debug mapwidgets   # Fine-grained log control

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Where formatted events are written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogTarget {
    #[default]
    Discard,
    Stderr,
    File(PathBuf),
}

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (used when RUST_LOG is not set)
    pub debug: bool,
    /// Filter directive from the config file, below `debug` in precedence
    pub level: Option<String>,
    pub target: LogTarget,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        let fallback = if self.debug {
            "debug"
        } else {
            self.level.as_deref().unwrap_or("info")
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Install the global subscriber
pub fn init(config: &TracingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug)
        .compact();

    let installed = match &config.target {
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|err| anyhow!(err))
}
