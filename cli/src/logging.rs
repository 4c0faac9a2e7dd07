//! Logging setup
//!
//! Command output owns stdout, so every log line goes to stderr. The level
//! and format come from `--log-level`/`--json-logs` when given, otherwise from
//! the `[logging]` section; `RUST_LOG` overrides both.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingSettings;

/// Effective logging choice after merging flags and config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: String,
    pub json: bool,
}

impl LogOptions {
    pub fn resolve(flag_level: Option<String>, flag_json: bool, settings: &LoggingSettings) -> Self {
        Self {
            level: flag_level.unwrap_or_else(|| settings.level.clone()),
            json: flag_json || settings.format.eq_ignore_ascii_case("json"),
        }
    }
}

pub fn init(options: &LogOptions) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.level))
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", options.level, e))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if options.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to init logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(level: &str, format: &str) -> LoggingSettings {
        LoggingSettings {
            level: level.to_string(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let options = LogOptions::resolve(Some("debug".into()), true, &settings("warn", "text"));
        assert_eq!(options.level, "debug");
        assert!(options.json);
    }

    #[test]
    fn test_config_used_without_flags() {
        let options = LogOptions::resolve(None, false, &settings("warn", "JSON"));
        assert_eq!(options.level, "warn");
        assert!(options.json);

        assert!(!LogOptions::resolve(None, false, &LoggingSettings::default()).json);
    }
}
