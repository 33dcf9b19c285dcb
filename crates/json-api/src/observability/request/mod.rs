//! Per-request span, request id and completion logging.

mod parent_context;
mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::Instrument as _;
use tracing::{error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use loyalty_app::auth::Principal;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Probes scraped often enough that logging them is noise.
const UNTRACED_PATHS: [&str; 2] = ["/metrics", "/healthcheck"];

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if UNTRACED_PATHS.contains(&req.uri().path()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let remote_addr = req.remote_addr().to_string();
    let spans::RequestSpanName {
        otel_path,
        otel_span_name,
    } = spans::request_span_name(&method, &path);
    let _in_flight = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %remote_addr,
        user_uuid = tracing::field::Empty,
        role = tracing::field::Empty,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    if settings::otel_parent_propagation_enabled()
        && let Some(parent_context) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent_context)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let elapsed = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);

    metrics::observe_request(&method, &otel_path, status.as_u16(), elapsed.as_secs_f64());

    if let Ok(principal) = depot.obtain::<Principal>() {
        span.record("user_uuid", tracing::field::display(principal.user_uuid));
        span.record("role", principal.role.as_str());
    }

    let duration_ms = elapsed.as_millis();

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);
    span.in_scope(|| log_outcome(status, duration_ms));
}

/// One completion line per request, escalated for failures and slow responses.
fn log_outcome(status: StatusCode, duration_ms: u128) {
    let code = status.as_u16();

    if status.is_server_error() {
        error!(status = code, duration_ms, "request failed");
    } else if status.is_client_error() {
        warn!(status = code, duration_ms, "request rejected");
    } else {
        info!(status = code, duration_ms, "request completed");
    }

    let threshold_ms = u128::from(settings::slow_request_threshold_ms());

    if duration_ms > threshold_ms {
        warn!(duration_ms, threshold_ms, "slow request");
    }
}
