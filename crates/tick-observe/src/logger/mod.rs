mod config;
mod error;
mod format;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LogFormat;

/// Install the process-wide tracing subscriber described by `cfg`.
///
/// Must be called once, before the first log line; a second call fails
/// with [`LoggerError::AlreadyInitialized`].
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LogFormat::Text => log::Logger::text(cfg),
        LogFormat::Json => log::Logger::json(cfg),
        LogFormat::Journald => log::Logger::journald(cfg),
    }
}
