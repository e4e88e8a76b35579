//! Process-wide `tracing` subscriber
//!
//! - `RUST_LOG` wins when set, otherwise `LOG_LEVEL` (default `info`)
//! - `LOG_FORMAT` is `full` (default), `compact` or `pretty`

use tracing_subscriber::EnvFilter;

use crate::config::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Full,
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "compact" => Self::Compact,
            "pretty" => Self::Pretty,
            _ => Self::Full,
        }
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env("LOG_LEVEL", "info".to_string())));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match LogFormat::parse(&env("LOG_FORMAT", "full".to_string())) {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("Compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("json"), LogFormat::Full);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
    }
}
