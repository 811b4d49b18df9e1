use tracing_subscriber::EnvFilter;

/// Directive applied when `RUST_LOG` is absent or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Install the JSON subscriber. Later calls leave the first one in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_target(false)
        .try_init();
}
