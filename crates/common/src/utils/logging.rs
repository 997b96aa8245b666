use std::io;

use configs::{LogConfig, LogEncoding};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber from `LogConfig`.
/// - `RUST_LOG` wins over `cfg.level` when set
/// - `json` encoding for production, `console` for local work
/// - Safe to call more than once; later calls are ignored
pub fn init_logging(cfg: &LogConfig) {
    match cfg.encoding {
        LogEncoding::Json => init_logging_json(&cfg.level),
        LogEncoding::Console => init_logging_console(&cfg.level),
    }
}

/// Initialize tracing subscriber with the compact console format.
pub fn init_logging_console(default_level: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(default_level))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
pub fn init_logging_json(default_level: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(default_level))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let cfg = LogConfig { level: "debug".into(), encoding: LogEncoding::Console };
        init_logging(&cfg);
        init_logging(&cfg);
        tracing::info!("logging initialised twice");
    }

    #[test]
    fn bad_level_falls_back() {
        let filter = env_filter("not a [valid filter");
        assert!(!filter.to_string().is_empty());
    }
}
