//! Request ID resolution and response header helpers.

use salvo::{
    http::{StatusCode, header::HeaderValue},
    prelude::Response,
};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id that is echoed back.
const MAX_REQUEST_ID_LENGTH: usize = 128;

/// Reuse the caller's id when it is short and printable, otherwise mint a v7 UUID.
pub(super) fn resolve_request_id(header_value: Option<String>) -> String {
    header_value
        .map(|value| value.trim().to_string())
        .filter(|value| is_acceptable(value))
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

fn is_acceptable(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LENGTH
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

pub(super) fn set_request_id_header(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => warn!(request_id, "could not encode request id header: {source}"),
    }
}

pub(super) fn response_status_or_ok(status_code: Option<StatusCode>) -> StatusCode {
    status_code.unwrap_or(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_well_formed_caller_ids() {
        assert_eq!(
            resolve_request_id(Some(" req-42.a:b ".to_string())),
            "req-42.a:b"
        );
    }

    #[test]
    fn replaces_missing_or_hostile_ids() {
        for value in [None, Some(String::new()), Some("a b".to_string()), Some("x".repeat(129))] {
            let id = resolve_request_id(value.clone());

            assert!(
                Uuid::parse_str(&id).is_ok(),
                "{value:?} should be replaced with a uuid"
            );
        }
    }
}
