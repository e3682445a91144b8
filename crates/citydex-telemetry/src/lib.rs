//! Tracing setup shared by Citydex binaries.
//!
//! Installs a `tracing` subscriber that writes human-readable or JSON logs,
//! forwards `log` records into `tracing`, and optionally exports spans to an
//! OTLP collector.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};
use typed_builder::TypedBuilder;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to bridge log records: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("failed to build otlp exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct TelemetryConfig {
    #[builder(setter(into))]
    service_name: String,
    #[builder(default)]
    format: LogFormat,
    /// Filter used when `RUST_LOG` is not set.
    #[builder(default = "info".to_string(), setter(into))]
    default_filter: String,
    /// OTLP gRPC endpoint; spans are only exported when set.
    #[builder(default)]
    otlp_endpoint: Option<String>,
}

/// Flushes pending spans when dropped.
#[must_use = "dropping the guard shuts down span export"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to shut down tracer provider: {err}");
            }
        }
    }
}

/// Installs the global subscriber. Call once, early in `main`.
pub fn init(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let fmt_layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    let provider = config
        .otlp_endpoint
        .as_deref()
        .map(|endpoint| tracer_provider(&config.service_name, endpoint))
        .transpose()?;
    let otel_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(config.service_name.clone()))
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer);

    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(TelemetryGuard { provider })
}

fn tracer_provider(service_name: &str, endpoint: &str) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TelemetryConfig::builder().service_name("citydex-test").build();
        assert_eq!(config.service_name, "citydex-test");
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.default_filter, "info");
        assert_eq!(config.otlp_endpoint, None);
    }
}
