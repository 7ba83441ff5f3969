//! Response body endpoints
//!
//! The same text or entity written through different response shapes.

use hyper::StatusCode;

use super::{ok, HandlerResult};
use crate::binding::{RequestContext, ResponseEntity};
use crate::http;
use crate::model::HelloData;
use crate::routing::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("response-body-string-v1", "/response-body-string-v1", response_body_v1),
        RouteSpec::get("response-body-string-v2", "/response-body-string-v2", response_body_v2),
        RouteSpec::get("response-body-string-v3", "/response-body-string-v3", response_body_v3),
        RouteSpec::get("response-body-json-v1", "/response-body-json-v1", response_body_json_v1),
        RouteSpec::get("response-body-json-v2", "/response-body-json-v2", response_body_json_v2),
    ]
}

fn user_a() -> HelloData {
    HelloData::new("userA", 20)
}

/// Build the response by hand
#[allow(clippy::unnecessary_wraps)]
fn response_body_v1(_ctx: &RequestContext) -> HandlerResult {
    Ok(http::build_text_response(StatusCode::OK, "ok"))
}

/// Status and body as one entity
#[allow(clippy::unnecessary_wraps)]
fn response_body_v2(_ctx: &RequestContext) -> HandlerResult {
    Ok(ResponseEntity::new("ok", StatusCode::OK).into_response())
}

#[allow(clippy::unnecessary_wraps)]
fn response_body_v3(_ctx: &RequestContext) -> HandlerResult {
    Ok(ok())
}

fn response_body_json_v1(_ctx: &RequestContext) -> HandlerResult {
    http::build_json_response(StatusCode::OK, &user_a())
}

/// Same entity, relying on the default success status
fn response_body_json_v2(_ctx: &RequestContext) -> HandlerResult {
    http::build_json_response(StatusCode::default(), &user_a())
}
