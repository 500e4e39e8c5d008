//! Prometheus exposition and per-request HTTP metrics

use std::time::Instant;

use axum::body::Body;
use axum::extract::{MatchedPath, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Register help text for the booking counters so they show up in the
/// scrape output before their first increment.
pub fn describe_booking_metrics() {
    metrics::describe_counter!("bookings_created_total", "Reservations created");
    metrics::describe_counter!(
        "booking_conflicts_total",
        "Bookings rejected because the dates were taken or the venue was busy"
    );
    metrics::describe_counter!("reservations_cancelled_total", "Reservations cancelled");
    metrics::describe_counter!("reservations_completed_total", "Reservations completed");
    metrics::describe_counter!(
        "payments_voided_total",
        "Pending payments voided or removed by a cancellation"
    );
    metrics::describe_counter!("http_requests_total", "HTTP requests by route and status");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        metrics::Unit::Seconds,
        "HTTP request latency by route"
    );
}

/// `GET /metrics`
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}

/// Labels by route template rather than raw path so ids do not explode
/// the series count.
pub async fn track_http_metrics(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();
    metrics::counter!("http_requests_total", "method" => method.clone(), "route" => route.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "route" => route)
        .record(elapsed);

    response
}
