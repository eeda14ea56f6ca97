//! tapeloop - terminal front end for the looper
//!
//! Run with: cargo run --bin tapeloop
//! Logs go to `tapeloop.log`; set RUST_LOG to change the level.

mod app;
mod ui;

use std::fs::File;

use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use app::Tapeloop;

const LOG_FILE: &str = "tapeloop.log";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // The terminal belongs to the UI, so logs go to a file
    let log_file = File::create(LOG_FILE).wrap_err("failed to create log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    Tapeloop::new().buffer_seconds(8.0).run()
}
