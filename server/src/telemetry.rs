//! Logging setup and per-request store metrics.
//!
//! Console logging is always on. Traces and logs are additionally exported over
//! OTLP when `OTEL_EXPORTER_OTLP_ENDPOINT` points at a reachable collector.
//! A tracing Layer counts `store.op` spans per HTTP request.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use std::time::Duration;
use tracing::{span::Id, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

pub const SERVICE_NAME: &str = "pantry-server";
pub const STORE_OP_COUNT_HEADER: &str = "X-Store-Op-Count";

/// Initialize telemetry with optional OpenTelemetry export.
/// If OTEL_EXPORTER_OTLP_ENDPOINT is set and reachable, traces and logs are sent to the collector.
/// Otherwise, only console logging is used.
pub fn init_telemetry() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(endpoint) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok() else {
        init_console_only(env_filter);
        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return;
    };

    if !collector_reachable(&endpoint) {
        init_console_only(env_filter);
        tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        );
        return;
    }

    let service_name = env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.to_string());
    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.clone())
        .build();

    let trace_exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            init_console_only(env_filter);
            tracing::warn!("Failed to create OTLP trace exporter: {}", e);
            return;
        }
    };

    let log_exporter = match opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            init_console_only(env_filter);
            tracing::warn!("Failed to create OTLP log exporter: {}", e);
            return;
        }
    };

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();
    let tracer = trace_provider.tracer(SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(trace_provider);

    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(StoreOpCountingLayer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(OpenTelemetryTracingBridge::new(&log_provider))
        .init();

    tracing::info!(
        "OpenTelemetry enabled, exporting traces and logs to {} as {}",
        endpoint,
        service_name
    );
}

fn init_console_only(env_filter: tracing_subscriber::EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(StoreOpCountingLayer)
        .init();
}

/// Quick TCP check so a missing collector doesn't stall every export.
fn collector_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

tokio::task_local! {
    /// Store operations issued by the current request.
    /// Follows the async task across await points and thread migrations.
    static STORE_OP_COUNTER: Arc<AtomicU32>;
}

/// Store operation count for the current request, if one is being tracked.
pub fn store_op_count() -> Option<u32> {
    STORE_OP_COUNTER
        .try_with(|counter| counter.load(Ordering::Relaxed))
        .ok()
}

/// A tracing Layer that counts `store.op` spans per HTTP request.
///
/// Store calls run synchronously inside the handler's task, so the task-local
/// counter set up by [`store_op_scope_middleware`] is in scope when the span
/// is created.
pub struct StoreOpCountingLayer;

impl<S> Layer<S> for StoreOpCountingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, _attrs: &tracing::span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        if span.name() == "store.op" {
            let _ = STORE_OP_COUNTER.try_with(|counter| {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
    }
}

/// Middleware that initializes the per-request store operation counter.
///
/// Must be the outermost layer so the counter wraps the whole request.
pub async fn store_op_scope_middleware(request: Request<Body>, next: Next) -> Response {
    let counter = Arc::new(AtomicU32::new(0));
    STORE_OP_COUNTER.scope(counter, next.run(request)).await
}

/// Middleware that adds the X-Store-Op-Count header to responses.
/// Only enabled when TRACK_STORE_OP_COUNT=1.
pub async fn store_op_count_header_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    if env::var("TRACK_STORE_OP_COUNT")
        .map(|v| v == "1")
        .unwrap_or(false)
    {
        if let Some(count) = store_op_count() {
            if let Ok(value) = axum::http::header::HeaderValue::from_str(&count.to_string()) {
                response.headers_mut().insert(STORE_OP_COUNT_HEADER, value);
            }
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;
    use crate::store::MemoryStore;
    use crate::AppState;
    use tower::ServiceExt;

    async fn op_count_for(app: &axum::Router, uri: &str) -> Option<String> {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response
            .headers()
            .get(STORE_OP_COUNT_HEADER)
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_store_op_count_header_per_request() {
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(StoreOpCountingLayer));
        env::set_var("TRACK_STORE_OP_COUNT", "1");

        let app = crate::router(AppState::new(Arc::new(MemoryStore::new()), Policy::default()));

        assert_eq!(op_count_for(&app, "/api/categories").await.as_deref(), Some("1"));
        assert_eq!(op_count_for(&app, "/").await.as_deref(), Some("0"));
        // The counter starts over for every request.
        assert_eq!(op_count_for(&app, "/api/categories").await.as_deref(), Some("1"));
    }

    #[test]
    fn test_no_count_outside_a_request() {
        assert_eq!(store_op_count(), None);
    }
}
