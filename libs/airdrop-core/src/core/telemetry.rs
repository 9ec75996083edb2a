use std::time::Duration;

use opentelemetry::trace::TracerProvider;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::{Sampler, SdkTracer};
use opentelemetry_sdk::Resource;

const DEFAULT_OTLP_TRACES_URL: &str = "http://localhost:4318/v1/traces";
const DEFAULT_OTLP_LOGS_URL: &str = "http://localhost:4318/v1/logs";
const EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

fn make_resource(service_name: &'static str) -> Resource {
    Resource::builder()
        .with_service_name(service_name)
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Create tracer exporting spans over OTLP/HTTP
///
/// The tracer provider is also installed as global provider, so that direct
/// OpenTelemetry API usage lands in the same exporter.
pub fn create_otlp_tracer(
    service_name: &'static str,
    url: Option<String>,
) -> eyre::Result<SdkTracer> {
    let otlp_trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(url.unwrap_or(DEFAULT_OTLP_TRACES_URL.into()))
        .with_timeout(EXPORT_TIMEOUT)
        .build()?;

    let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_simple_exporter(otlp_trace_exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(make_resource(service_name))
        .build();

    let tracer = tracer_provider.tracer(service_name);

    global::set_tracer_provider(tracer_provider);

    Ok(tracer)
}

/// Create logger provider exporting log events over OTLP/HTTP
///
/// Bridge it into `tracing` with `OpenTelemetryTracingBridge`.
pub fn create_otlp_logger_provider(
    service_name: &'static str,
    url: Option<String>,
) -> eyre::Result<SdkLoggerProvider> {
    let otlp_log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_http()
        .with_endpoint(url.unwrap_or(DEFAULT_OTLP_LOGS_URL.into()))
        .with_timeout(EXPORT_TIMEOUT)
        .build()?;

    let logger_provider = SdkLoggerProvider::builder()
        .with_simple_exporter(otlp_log_exporter)
        .with_resource(make_resource(service_name))
        .build();

    Ok(logger_provider)
}
