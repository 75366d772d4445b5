use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request, Response},
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn request_id(request: &Request<Body>) -> &str {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

type MakeSpan = fn(&Request<Body>) -> tracing::Span;
type OnRequest = fn(&Request<Body>, &tracing::Span);
type OnResponse = fn(&Response<Body>, Duration, &tracing::Span);

pub type HttpTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    MakeSpan,
    OnRequest,
    OnResponse,
>;

/// Request span + start/finish events keyed by `x-request-id`.
pub fn trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpan)
        .on_request(on_request as OnRequest)
        .on_response(on_response as OnResponse)
}

fn make_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request)
    )
}

fn on_request(request: &Request<Body>, _span: &tracing::Span) {
    tracing::info!(
        request_id = %request_id(request),
        method = %request.method(),
        uri = %request.uri(),
        "request started"
    );
}

fn on_response(response: &Response<Body>, latency: Duration, _span: &tracing::Span) {
    tracing::info!(
        status = %response.status(),
        ms = %latency.as_millis(),
        "request finished"
    );
}
