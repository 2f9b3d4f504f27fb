use std::path::Path;

use anyhow::{Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Map a textual level to a filter, `RUST_LOG` taking precedence over `log_level`.
pub fn resolve_level(log_level: &str) -> LevelFilter {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    parse_level(&level)
}

pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().trim() {
        "off" => LevelFilter::Off,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Install the global logger.
///
/// Records go to stderr so command output on stdout stays pipeable. When a
/// log file is given, records are also appended to it and to a date-suffixed
/// sibling.
pub fn init_logger<P: AsRef<Path>>(
    log_level: &str,
    log_file: Option<P>,
) -> Result<()> {
    let colors = ColoredLevelConfig::new().info(Color::Green).debug(Color::Cyan).warn(Color::Yellow).error(Color::Red);

    let mut dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            out.finish(format_args!(
                "[{} {} {}] {}",
                time,
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(resolve_level(log_level))
        .chain(std::io::stderr());

    if let Some(log_file) = log_file {
        let log_path = log_file.as_ref();
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create logs path [{}] failed", parent.to_string_lossy()))?;
            }
        }
        dispatch = dispatch
            .chain(fern::log_file(log_path).with_context(|| format!("open log file [{}] failed", log_path.display()))?)
            .chain(fern::DateBased::new(log_path, ".%Y-%m-%d"));
    }

    dispatch.apply().context("logger already initialized")?;
    Ok(())
}
