//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

#[derive(Debug)]
struct HttpMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    domain_events_total: IntCounterVec,
}

/// Programme actions counted on `/metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DomainEvent {
    UserRegistered,
    DealRegistered,
    DealApproved,
    DealRejected,
    RewardRedeemed,
    RedemptionUpdated,
    PointsAdjusted,
    TicketOpened,
}

impl DomainEvent {
    const fn as_str(self) -> &'static str {
        match self {
            Self::UserRegistered => "user_registered",
            Self::DealRegistered => "deal_registered",
            Self::DealApproved => "deal_approved",
            Self::DealRejected => "deal_rejected",
            Self::RewardRedeemed => "reward_redeemed",
            Self::RedemptionUpdated => "redemption_updated",
            Self::PointsAdjusted => "points_adjusted",
            Self::TicketOpened => "ticket_opened",
        }
    }
}

pub(crate) fn record_event(event: DomainEvent) {
    if let Some(metrics) = metrics() {
        metrics
            .domain_events_total
            .with_label_values(&[event.as_str()])
            .inc();
    }
}

static HTTP_METRICS: OnceLock<Option<HttpMetrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let metric_families = metrics.registry.gather();

    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metric_families, &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    let content_type = match HeaderValue::from_str(encoder.format_type()) {
        Ok(value) => value,
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    };

    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static HttpMetrics> {
    HTTP_METRICS.get_or_init(build_metrics).as_ref()
}

fn build_metrics() -> Option<HttpMetrics> {
    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new(
            "loyalty_json_http_requests_total",
            "Total HTTP requests partitioned by method, route, status class, and status code.",
        ),
        &["method", "route", "status_class", "status_code"],
    );

    let request_duration_seconds = HistogramVec::new(
        HistogramOpts::new(
            "loyalty_json_http_request_duration_seconds",
            "HTTP request duration in seconds partitioned by method and route.",
        )
        .buckets(vec![
            0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "route"],
    );

    let requests_in_flight = IntGauge::with_opts(Opts::new(
        "loyalty_json_http_requests_in_flight",
        "Current number of in-flight HTTP requests.",
    ));

    let domain_events_total = IntCounterVec::new(
        Opts::new(
            "loyalty_json_domain_events_total",
            "Completed programme actions partitioned by event.",
        ),
        &["event"],
    );

    Some(HttpMetrics {
        requests_total: register(&registry, "requests_total", requests_total)?,
        request_duration_seconds: register(
            &registry,
            "request_duration_seconds",
            request_duration_seconds,
        )?,
        requests_in_flight: register(&registry, "requests_in_flight", requests_in_flight)?,
        domain_events_total: register(&registry, "domain_events_total", domain_events_total)?,
        registry,
    })
}

/// Register a freshly built collector, logging and giving up on any failure.
fn register<C>(registry: &Registry, name: &str, collector: prometheus::Result<C>) -> Option<C>
where
    C: Collector + Clone + 'static,
{
    let collector = collector
        .inspect_err(|source| error!("failed to create {name} metric: {source}"))
        .ok()?;

    registry
        .register(Box::new(collector.clone()))
        .inspect_err(|source| error!("failed to register {name} metric: {source}"))
        .ok()?;

    Some(collector)
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };

    use super::{DomainEvent, metrics_handler, observe_request, record_event};

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_metrics() {
        observe_request("GET", "/api/deals", 200, 0.042);
        observe_request("GET", "/api/deals", 500, 0.123);
        record_event(DomainEvent::DealApproved);

        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        let response_result = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await;

        let response: String = response_result.unwrap_or_default();

        assert!(
            response.contains("loyalty_json_http_requests_total"),
            "expected requests_total metric in response"
        );
        assert!(
            response.contains("loyalty_json_http_request_duration_seconds"),
            "expected request_duration metric in response"
        );
        assert!(
            response.contains("loyalty_json_http_requests_in_flight"),
            "expected in-flight metric in response"
        );
        assert!(
            response.contains(r#"loyalty_json_domain_events_total{event="deal_approved"}"#),
            "expected domain event counter in response"
        );
    }
}
