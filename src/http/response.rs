//! HTTP response building module
//!
//! Builders for the response shapes the endpoints produce: plain text,
//! JSON entities, automatic OPTIONS replies and error documents.

use chrono::Local;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::RequestError;

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

/// Build a plain text response
pub fn build_text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", TEXT_PLAIN_UTF8)
        .body(Full::new(body.into()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a JSON response from a serializable entity
pub fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let json = serde_json::to_vec(body).map_err(RequestError::Serialization)?;

    Ok(Response::builder()
        .status(status)
        .header("Content-Type", APPLICATION_JSON)
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        }))
}

/// Build OPTIONS response listing the methods a path supports
pub fn build_options_response(allow: &str, enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", allow);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", allow)
            .header("Access-Control-Allow-Headers", "Content-Type, Accept")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Error document returned for every failed request
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    timestamp: String,
    status: u16,
    error: &'a str,
    message: &'a str,
    path: &'a str,
}

/// Build an error response with a JSON body
pub fn build_error_response(status: StatusCode, message: &str, path: &str) -> Response<Full<Bytes>> {
    let body = ErrorBody {
        timestamp: Local::now().to_rfc3339(),
        status: status.as_u16(),
        error: status.canonical_reason().unwrap_or("Unknown"),
        message,
        path,
    };
    let json = serde_json::to_vec(&body)
        .unwrap_or_else(|_| br#"{"error":"Internal server error"}"#.to_vec());

    Response::builder()
        .status(status)
        .header("Content-Type", APPLICATION_JSON)
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    tracing::error!("Failed to build {status} response: {error}");
}
