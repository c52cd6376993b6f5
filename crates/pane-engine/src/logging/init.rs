use std::sync::Once;

/// GPU stack crates that log heavily at `info`; capped unless the filter names them.
const NOISY_TARGETS: &[&str] = &["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `filter` follows the `env_logger` syntax (e.g. "debug", "pane_engine=trace,wgpu=warn").
/// When unset, `RUST_LOG` is used, then `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Cap the GPU stack's own logs at `warn`.
    pub quiet_gpu: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
            quiet_gpu: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    fn resolved_filter(&self) -> Option<String> {
        self.filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        let filter = config.resolved_filter();

        match &filter {
            Some(filter) => {
                builder.parse_filters(filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        if config.quiet_gpu {
            for target in NOISY_TARGETS {
                let named = filter.as_deref().is_some_and(|f| f.contains(target));
                if !named {
                    builder.filter_module(target, log::LevelFilter::Warn);
                }
            }
        }

        builder.write_style(config.write_style);
        if builder.try_init().is_err() {
            // Another logger was installed by the embedding application.
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig::default().with_filter("pane_engine=trace");
        assert_eq!(config.resolved_filter().as_deref(), Some("pane_engine=trace"));
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default().with_filter("trace"));
    }
}
