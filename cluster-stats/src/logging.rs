use crate::config::LoggingConfig;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Calling this more than once is a no-op.
pub fn init_tracing(config: &LoggingConfig) {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let fmt_layer = if config.json_format {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let _ = Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
