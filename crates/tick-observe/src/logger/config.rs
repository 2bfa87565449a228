use std::io::{IsTerminal, stdout};

use crate::logger::format::LogFormat;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LogFormat,
    /// Env-filter directive, e.g. `info` or `tick_core=debug,info`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "info".to_string(),
            with_targets: true,
            use_color: stdout().is_terminal(),
        }
    }
}
