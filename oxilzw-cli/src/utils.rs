//! Utility functions for the CLI.

use oxilzw::Result;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or info
/// messages with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "oxilzw=info" } else { "oxilzw=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

/// Read all of `path`, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let data = match path {
        Some(path) => fs::read(path)?,
        None => {
            let mut data = Vec::new();
            io::stdin().lock().read_to_end(&mut data)?;
            data
        }
    };
    Ok(data)
}

/// Write `data` to `path`, or stdout when no path is given.
pub fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => fs::write(path, data)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Space saved by `compressed` relative to `original`, in percent.
pub fn space_savings(original: usize, compressed: usize) -> f64 {
    if original == 0 {
        0.0
    } else {
        (1.0 - compressed as f64 / original as f64) * 100.0
    }
}

/// Human-readable name of an optional path.
pub fn display_name(path: Option<&Path>, fallback: &str) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| fallback.to_string())
}
