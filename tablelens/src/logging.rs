//! Logging setup for applications embedding the profiler.
//!
//! The library itself only emits `tracing` events; hosts that want output
//! on stderr can initialize a subscriber through [`init_logging`].

use tracing::Level;

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application.
    pub level: Level,
    /// Log level for profiler events specifically.
    pub profiler_level: Level,
    /// Whether to use JSON output format.
    pub json_format: bool,
    /// Environment filter override.
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            profiler_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Configuration for production use.
    pub fn production() -> Self {
        Self {
            level: Level::WARN,
            profiler_level: Level::INFO,
            json_format: true,
            env_filter: None,
        }
    }

    /// Configuration for development use.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            profiler_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
        }
    }

    /// Sets the log level for the application.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the log level for profiler events.
    pub fn with_profiler_level(mut self, level: Level) -> Self {
        self.profiler_level = level;
        self
    }

    /// Sets whether to use JSON output format.
    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// Sets a custom environment filter.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the environment filter string.
    pub fn env_filter(&self) -> String {
        if let Some(ref filter) = self.env_filter {
            filter.clone()
        } else {
            format!(
                "{},tablelens={}",
                self.level.as_str().to_lowercase(),
                self.profiler_level.as_str().to_lowercase()
            )
        }
    }
}

/// Initializes a global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured levels when set.
///
/// # Examples
///
/// ```rust,no_run
/// use tablelens::logging::{init_logging, LoggingConfig};
///
/// init_logging(LoggingConfig::development()).unwrap();
/// ```
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

    let fmt_layer = if config.json_format {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
