//! Logger installation.
//!
//! Lines look like `[2026/01/31 12:00:00] [INFO ferrous_renderer::geometry::mesh] mesh built: ...`
//! and go to stdout, plus the configured log file when there is one.

use fern::{Dispatch, InitError};

use crate::config::LogConfig;

/// Builds the dispatcher for `config` without installing it.
pub fn dispatch(config: &LogConfig) -> Result<Dispatch, std::io::Error> {
    let mut dispatch = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{} {}] {}",
                chrono::Local::now().format("%Y/%m/%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.level)
        // naga and wgpu are chatty at debug level
        .level_for("naga", log::LevelFilter::Warn)
        .level_for("wgpu_core", log::LevelFilter::Warn)
        .level_for("wgpu_hal", log::LevelFilter::Warn)
        .chain(std::io::stdout());

    if let Some(path) = &config.file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }
    Ok(dispatch)
}

/// Installs the global logger.  Fails if one is already installed.
pub fn init(config: &LogConfig) -> Result<(), InitError> {
    dispatch(config)?.apply()?;
    log::debug!("logging at {} level", config.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use log::{Level, LevelFilter};

    use super::*;

    #[test]
    fn lines_carry_level_and_target() {
        let (tx, rx) = mpsc::channel();
        let config = LogConfig {
            level: LevelFilter::Debug,
            file: None,
        };
        let (level, logger) = dispatch(&config).unwrap().chain(tx).into_log();
        assert_eq!(level, LevelFilter::Debug);

        logger.log(
            &log::Record::builder()
                .args(format_args!("mesh built"))
                .level(Level::Warn)
                .target("ferrous_renderer::geometry")
                .build(),
        );
        let line = rx.recv().unwrap();
        assert!(line.contains("[WARN ferrous_renderer::geometry] mesh built"), "{line}");
    }

    #[test]
    fn noisy_dependencies_are_capped() {
        let (tx, rx) = mpsc::channel();
        let config = LogConfig {
            level: LevelFilter::Trace,
            file: None,
        };
        let (_, logger) = dispatch(&config).unwrap().chain(tx).into_log();
        logger.log(
            &log::Record::builder()
                .args(format_args!("validating"))
                .level(Level::Debug)
                .target("naga")
                .build(),
        );
        assert!(rx.try_recv().is_err());
    }
}
