use clap::ValueEnum;

/// Verbosity of the diagnostics written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    /// No subscriber is installed.
    Silent,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("debug", Some(tracing::Level::DEBUG))]
    #[case("warn", Some(tracing::Level::WARN))]
    #[case("silent", None)]
    fn parses_cli_names(#[case] name: &str, #[case] expected: Option<tracing::Level>) {
        let level = LogLevel::from_str(name, true).expect("level should parse");
        assert_eq!(level.to_tracing_level(), expected);
    }
}
