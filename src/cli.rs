use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "whitted", about = "Renders the reference scene by recursive ray tracing")]
pub struct Args {
    /// Render settings (TOML). Missing file means built-in defaults.
    #[arg(short, long, default_value = "whitted.toml")]
    pub config: PathBuf,

    /// Override the number of cells along each side of the image plane
    #[arg(short, long)]
    pub divisions: Option<usize>,

    /// Write the rendered image to this PNG file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not open a window, even when built with the `window` feature
    #[arg(long)]
    pub headless: bool,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
