//! Tracing setup.
//!
//! The TUI owns the terminal, so interactive sessions only log when a log
//! file is given. Non-interactive commands log to stderr.
//! `FOLIO_LOG` overrides the level with any `EnvFilter` directive.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "FOLIO_LOG";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: Level::WARN,
            log_file: None,
        }
    }
}

impl LogConfig {
    /// 0 → warn, 1 → info, 2 → debug, 3+ → trace
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        LogConfig {
            level,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("folio={}", level.as_str().to_lowercase())))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &LogConfig, interactive: bool) -> io::Result<()> {
    let filter = build_env_filter(config.level);
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    } else if !interactive {
        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .without_time();
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    }
    Ok(())
}
