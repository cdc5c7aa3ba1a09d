use clap::{Args, ValueEnum};
use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Logging flags shared by every subcommand.
#[derive(Args, Debug, Clone, Copy)]
pub struct LogSettings {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Only log errors. Overrides `--log-level`.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl LogSettings {
    pub fn max_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.log_level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    /// Install the stderr subscriber. Stdout carries record output only.
    pub fn init(&self) {
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(self.max_level())
            .with_ansi(false)
            .with_target(false);

        let _ = match self.log_format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_overrides_level() {
        let settings = LogSettings {
            log_format: LogFormat::Text,
            log_level: LogLevel::Trace,
            quiet: true,
        };
        assert_eq!(settings.max_level(), LevelFilter::ERROR);
    }

    #[test]
    fn level_maps_through() {
        let settings = LogSettings {
            log_format: LogFormat::Json,
            log_level: LogLevel::Debug,
            quiet: false,
        };
        assert_eq!(settings.max_level(), LevelFilter::DEBUG);
    }
}
