//! Tracing subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name recorded on every span.
pub const SERVICE_NAME: &str = "instant-access";

/// Trace file name inside the data directory.
pub const TRACE_FILE_NAME: &str = "instant-access-otlp.json";

/// Installs the global subscriber: an `EnvFilter` plus an OpenTelemetry layer
/// exporting to `<data dir>/instant-access-otlp.json`.
///
/// The filter comes from `RUST_LOG` when set, else `config.trace_level`, else
/// `info`. Returns `false` when the data directory cannot be created or a
/// subscriber is already installed; tracing is optional and never fails the
/// caller.
///
/// ```rust
/// use instant_access::observability::init_tracing;
/// use instant_access::Config;
///
/// let config = Config { trace_level: Some("debug".to_string()), ..Config::default() };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> bool {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return false;
    }

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", SERVICE_NAME),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE_NAME), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_ok()
}
