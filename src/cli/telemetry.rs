//! Tracing subscriber setup, optionally exporting spans over OTLP.
//!
//! The OTLP pipeline is only wired when `OTEL_EXPORTER_OTLP_ENDPOINT` is
//! set; otherwise logs go to stdout only. `GATEHOUSE_LOG_FORMAT=json`
//! switches the stdout format to JSON.

use anyhow::{Context, Result};
use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, propagation::TraceContextPropagator, runtime, trace};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const OTLP_EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

/// Initialize the tracing subscriber.
///
/// # Errors
///
/// Returns an error if a filter directive does not parse, the OTLP
/// exporter cannot be built, or a subscriber is already installed.
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let filter = match verbosity_level {
        // No -v flag, fall back to RUST_LOG, then errors only.
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        Some(level) => EnvFilter::default()
            .add_directive(level.into())
            .add_directive("hyper=error".parse().context("invalid filter directive")?)
            .add_directive("h2=error".parse().context("invalid filter directive")?)
            .add_directive("tonic=error".parse().context("invalid filter directive")?),
    };

    let json_output = std::env::var("GATEHOUSE_LOG_FORMAT")
        .is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let fmt_layer = if json_output {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let otlp_layer = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(endpoint) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(&endpoint)
                .with_timeout(OTLP_EXPORT_TIMEOUT)
                .build()
                .context("Failed to build OTLP span exporter")?;

            let provider = trace::TracerProvider::builder()
                .with_batch_exporter(exporter, runtime::Tokio)
                .with_resource(Resource::new(vec![KeyValue::new(
                    "service.name",
                    env!("CARGO_PKG_NAME"),
                )]))
                .build();

            let tracer = provider.tracer(env!("CARGO_PKG_NAME"));

            global::set_tracer_provider(provider);
            global::set_text_map_propagator(TraceContextPropagator::new());

            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        Err(_) => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otlp_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

/// Flush and shut down the global tracer provider.
pub fn shutdown() {
    global::shutdown_tracer_provider();
}
