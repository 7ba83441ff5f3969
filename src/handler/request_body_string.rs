//! Raw text body endpoints

use std::io::{Read, Write};

use hyper::StatusCode;

use super::{ok, HandlerResult};
use crate::binding::{HttpEntity, RequestContext};
use crate::error::RequestError;
use crate::http;
use crate::routing::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::post("request-body-string-v1", "/request-body-string-v1", request_body_string_v1),
        RouteSpec::post("request-body-string-v2", "/request-body-string-v2", request_body_string_v2),
        RouteSpec::post("request-body-string-v3", "/request-body-string-v3", request_body_string_v3),
        RouteSpec::post("request-body-string-v4", "/request-body-string-v4", request_body_string_v4),
    ]
}

fn request_body_string_v1(ctx: &RequestContext) -> HandlerResult {
    let message_body = ctx.body_text()?;

    tracing::info!("messageBody={message_body}");
    Ok(ok())
}

/// Stream the body in through `Read` and the reply out through `Write`
fn request_body_string_v2(ctx: &RequestContext) -> HandlerResult {
    let mut message_body = String::new();
    ctx.body_reader()
        .read_to_string(&mut message_body)
        .map_err(|e| RequestError::InvalidBody(e.to_string()))?;
    tracing::info!("messageBody={message_body}");

    let mut writer = Vec::new();
    writer
        .write_all(b"ok")
        .map_err(|e| RequestError::InvalidBody(e.to_string()))?;
    Ok(http::build_text_response(StatusCode::OK, writer))
}

fn request_body_string_v3(ctx: &RequestContext) -> HandlerResult {
    let entity = HttpEntity::text(ctx)?;

    tracing::info!("messageBody={}", entity.body());
    Ok(HttpEntity::new("ok").into_response())
}

fn request_body_string_v4(ctx: &RequestContext) -> HandlerResult {
    let message_body: String = ctx.body_text()?;

    tracing::info!("messageBody={message_body}");
    Ok(ok())
}
