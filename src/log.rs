// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{Error, Result};

/// Install the global subscriber: stderr, plus an optional append-only debug file.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when `verbose`.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::io(path, e))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(f))
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr.with_filter(filter))
        .with(file)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialised: {e}")))
}
