//! Tracing setup for the binary
//!
//! `RUST_LOG` wins over the configured level. Output goes to stderr so
//! command output on stdout stays clean, or to `logging.file` when set.

use crate::config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive for the configured level
fn directive(config: &LoggingConfig) -> String {
    format!("gitfit={},warn", config.level)
}

fn filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(config)))
}

fn writer(config: &LoggingConfig) -> std::io::Result<BoxMakeWriter> {
    match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(std::io::stderr)),
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let registry = tracing_subscriber::registry().with(filter(config));
    let to_file = config.file.is_some();
    let writer = writer(config)?;

    let installed = match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(writer))
            .try_init(),
        _ => registry
            .with(fmt::layer().with_ansi(!to_file).with_writer(writer))
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
    Ok(())
}
