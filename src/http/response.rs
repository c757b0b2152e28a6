//! Rejection responses.
//!
//! # Responsibilities
//! - Turn a rejecting verdict into an HTTP response
//!
//! # Design Decisions
//! - Redirects use `302 Found` with `Location`
//! - A 403 status side effect wins over the redirect status, but the
//!   `Location` header is still sent
//! - Denials without a status side effect answer 401 (must authenticate)
//! - API requests (the only ones with a 403 side effect) get the platform's
//!   JSON error shape

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::access::{AccessError, Decision, Verdict};

#[derive(Debug, Serialize)]
struct ApiError {
    result: &'static str,
    message: String,
}

/// Build the response for a verdict, or `None` if the request may proceed.
pub fn rejection(verdict: &Verdict) -> Option<Response> {
    match &verdict.decision {
        Decision::Allow => None,
        Decision::Redirect(target) => match HeaderValue::from_str(target.as_str()) {
            Ok(location) => {
                let status = verdict.status.unwrap_or(StatusCode::FOUND);
                Some((status, [(header::LOCATION, location)], format!("Redirecting to {target}"))
                    .into_response())
            }
            Err(e) => {
                tracing::error!(target_url = %target, error = %e, "Redirect target is not a valid header value");
                Some(denied(verdict.status, &AccessError::LoginRequired))
            }
        },
        Decision::Denied(err) => Some(denied(verdict.status, err)),
    }
}

fn denied(status: Option<StatusCode>, err: &AccessError) -> Response {
    match status {
        Some(status) => (
            status,
            Json(ApiError {
                result: "error",
                message: err.to_string(),
            }),
        )
            .into_response(),
        None => (StatusCode::UNAUTHORIZED, err.to_string()).into_response(),
    }
}
