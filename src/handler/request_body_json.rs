//! JSON body endpoints
//!
//! v1 and v2 decode raw text and ignore `Content-Type`; v3 to v5 bind the
//! body directly and require a JSON content type.

use std::io::Read;

use hyper::StatusCode;

use super::{ok, HandlerResult};
use crate::binding::{decode_json, request_body_json, HttpEntity, RequestContext};
use crate::error::RequestError;
use crate::http;
use crate::model::HelloData;
use crate::routing::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::post("request-body-json-v1", "/request-body-json-v1", request_body_json_v1),
        RouteSpec::post("request-body-json-v2", "/request-body-json-v2", request_body_json_v2),
        RouteSpec::post("request-body-json-v3", "/request-body-json-v3", request_body_json_v3),
        RouteSpec::post("request-body-json-v4", "/request-body-json-v4", request_body_json_v4),
        RouteSpec::post("request-body-json-v5", "/request-body-json-v5", request_body_json_v5)
            .produces("application/json"),
    ]
}

fn log_hello(data: &HelloData) {
    tracing::info!("username={}, age={}", data.username, data.age);
}

fn request_body_json_v1(ctx: &RequestContext) -> HandlerResult {
    let mut message_body = String::new();
    ctx.body_reader()
        .read_to_string(&mut message_body)
        .map_err(|e| RequestError::InvalidBody(e.to_string()))?;
    tracing::info!("messageBody={message_body}");

    let data: HelloData = decode_json(&message_body)?;
    log_hello(&data);
    Ok(ok())
}

fn request_body_json_v2(ctx: &RequestContext) -> HandlerResult {
    let message_body = ctx.body_text()?;
    tracing::info!("messageBody={message_body}");

    let data: HelloData = decode_json(&message_body)?;
    log_hello(&data);
    Ok(ok())
}

fn request_body_json_v3(ctx: &RequestContext) -> HandlerResult {
    let data: HelloData = request_body_json(ctx)?;
    log_hello(&data);
    Ok(ok())
}

fn request_body_json_v4(ctx: &RequestContext) -> HandlerResult {
    let entity = HttpEntity::<HelloData>::json(ctx)?;
    log_hello(entity.body());
    Ok(ok())
}

/// Echo the bound entity back as JSON
fn request_body_json_v5(ctx: &RequestContext) -> HandlerResult {
    let data: HelloData = request_body_json(ctx)?;
    log_hello(&data);
    http::build_json_response(StatusCode::OK, &data)
}
