//! Maps raw responses and transport failures onto [`ApiError`].

use std::error::Error as _;

use reqwest::StatusCode;

use crate::{
    wire::{ErrorBody, ErrorEnvelope},
    ApiError, SessionHook,
};

/// Classifies a response status.
///
/// Returns `None` for statuses below 400 (204 included), which belong to the
/// response decoder. Anything from 500 up, non-standard codes included, is a
/// server error. A 401 notifies `session` before the error is returned.
pub(crate) fn classify_status(
    status: StatusCode,
    body: &[u8],
    session: &SessionHook,
) -> Option<ApiError> {
    let code = status.as_u16();
    if code < 400 {
        return None;
    }

    let parts = parse_error_body(body);
    let message = parts
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {code}"));

    if status == StatusCode::UNAUTHORIZED {
        session.notify();
        return Some(ApiError::Unauthorized {
            code: parts.code,
            message,
            details: parts.details,
        });
    }

    Some(if code < 500 {
        ApiError::Client {
            status: code,
            code: parts.code,
            message,
            details: parts.details,
        }
    } else {
        ApiError::Server {
            status: code,
            code: parts.code,
            message,
            details: parts.details,
        }
    })
}

/// Classifies a failure raised before a complete response was read.
///
/// Builder failures (bad header override, unparsable URL) happen before any
/// I/O and can never succeed, so they are not network errors.
pub(crate) fn classify_transport(err: reqwest::Error, timeout_ms: u64) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout { timeout_ms };
    }
    if err.is_builder() {
        return ApiError::InvalidRequest {
            message: transport_message(&err),
            source: err,
        };
    }
    ApiError::Network {
        message: transport_message(&err),
        source: Some(err),
    }
}

fn parse_error_body(body: &[u8]) -> ErrorBody {
    if body.is_empty() {
        return Default::default();
    }
    serde_json::from_slice::<ErrorEnvelope>(body)
        .map(ErrorEnvelope::into_parts)
        .unwrap_or_default()
}

/// Innermost cause text; reqwest's own `Display` is often just
/// "error sending request".
fn transport_message(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message = cause.to_string();
        source = cause.source();
    }
    message
}
