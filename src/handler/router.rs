//! Request entry module
//!
//! Entry point for HTTP request processing: body size limits, collection of
//! the body, dispatch, the `Server` header and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Request, Response};

use crate::config::AppState;
use crate::error::RequestError;
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let logging = &state.config.logging;
    let http_config = &state.config.http;

    let mut entry = logging.access_log.then(|| {
        AccessLogEntry::from_request(peer, req.method(), req.uri(), req.version(), req.headers())
    });
    logger::log_headers_count(req.headers().len(), logging.show_headers);

    let path = req.uri().path().to_string();
    let mut response = match read_request(req, http_config.max_body_size).await {
        Ok(request) => state.router.dispatch(request),
        Err(e) => e.into_response(&path),
    };

    if let Ok(value) = HeaderValue::from_str(&http_config.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.finish(response.status(), body_bytes, started.elapsed());
        logger::log_access(entry, &logging.access_log_format);
    }

    Ok(response)
}

/// Collect the body, enforcing the size limit
async fn read_request(req: Request<Incoming>, limit: u64) -> Result<Request<Bytes>, RequestError> {
    check_content_length(req.headers(), limit)?;

    let (parts, body) = req.into_parts();
    let max = usize::try_from(limit).unwrap_or(usize::MAX);
    let collected = Limited::new(body, max).collect().await.map_err(|e| {
        if e.is::<LengthLimitError>() {
            RequestError::PayloadTooLarge { limit }
        } else {
            RequestError::InvalidBody(e.to_string())
        }
    })?;

    Ok(Request::from_parts(parts, collected.to_bytes()))
}

/// Reject a declared `Content-Length` above the limit before reading anything
fn check_content_length(headers: &HeaderMap, limit: u64) -> Result<(), RequestError> {
    let Some(value) = headers.get(CONTENT_LENGTH) else {
        return Ok(());
    };

    match value.to_str().ok().and_then(|v| v.parse::<u64>().ok()) {
        Some(size) if size > limit => {
            tracing::warn!("Request body too large: {size} bytes (max: {limit})");
            Err(RequestError::PayloadTooLarge { limit })
        }
        Some(_) => Ok(()),
        None => {
            tracing::warn!("Invalid Content-Length value, relying on the streaming limit");
            Ok(())
        }
    }
}
