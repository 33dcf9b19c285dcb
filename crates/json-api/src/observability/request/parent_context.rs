//! W3C trace context extraction from incoming headers.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};

/// Remote parent for the request span, if the caller sent a valid `traceparent`.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    global::get_text_map_propagator(|propagator| {
        // Start from an empty context so a request without trace headers
        // never inherits whatever span happens to be active.
        let context = propagator.extract_with_context(&Context::new(), &Headers(headers));
        let valid = context.span().span_context().is_valid();

        valid.then_some(context)
    })
}

struct Headers<'a>(&'a HeaderMap);

impl Extractor for Headers<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use salvo::http::HeaderValue;

    use super::*;

    #[test]
    fn extracts_valid_traceparent_only() {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let mut headers = HeaderMap::new();

        assert!(
            extract_parent_context(&headers).is_none(),
            "no header means no parent"
        );

        headers.insert(
            "traceparent",
            HeaderValue::from_static("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
        );

        let context = extract_parent_context(&headers);

        assert!(context.is_some(), "valid traceparent should be extracted");

        headers.insert("traceparent", HeaderValue::from_static("00-garbage-01"));

        assert!(
            extract_parent_context(&headers).is_none(),
            "malformed traceparent is ignored"
        );
    }
}
