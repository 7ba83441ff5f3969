//! Query and form parameter binding endpoints
//!
//! Each route binds the same two inputs a different way: by manual lookup,
//! through `RequestParam` binders with varying required/default rules, as a
//! whole map, or onto `HelloData`.

use super::{ok, HandlerResult};
use crate::binding::{RequestContext, RequestParam};
use crate::error::RequestError;
use crate::model::HelloData;
use crate::routing::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::request("request-param-v1", "/request-param-v1", request_param_v1),
        RouteSpec::request("request-param-v2", "/request-param-v2", request_param_v2),
        RouteSpec::request("request-param-v3", "/request-param-v3", request_param_v3),
        RouteSpec::request("request-param-v4", "/request-param-v4", request_param_v4),
        RouteSpec::request(
            "request-param-required",
            "/request-param-required",
            request_param_required,
        ),
        RouteSpec::request(
            "request-param-default",
            "/request-param-default",
            request_param_default,
        ),
        RouteSpec::request("request-param-map", "/request-param-map", request_param_map),
        RouteSpec::request("model-attribute-v1", "/model-attribute-v1", model_attribute)
            .path("/model-attribute-v2"),
    ]
}

/// Read parameters straight from the decoded pairs
fn request_param_v1(ctx: &RequestContext) -> HandlerResult {
    let params = ctx.params();
    let username = params.first("username");
    let raw_age = params
        .first("age")
        .ok_or_else(|| RequestError::MissingParameter {
            name: "age".to_string(),
        })?;
    // Plain integer parse: surrounding whitespace is not stripped
    let age: i32 = raw_age.parse().map_err(|_| RequestError::TypeMismatch {
        name: "age".to_string(),
        value: raw_age.to_string(),
        target: "i32",
    })?;

    tracing::info!("username={}, age={age}", username.unwrap_or("null"));
    Ok(ok())
}

/// Parameter names differ from the local bindings
fn request_param_v2(ctx: &RequestContext) -> HandlerResult {
    let member_name: String = RequestParam::new("username").get(ctx.params())?;
    let member_a: i32 = RequestParam::new("age").get(ctx.params())?;

    tracing::info!("username={member_name}, age={member_a}");
    Ok(ok())
}

fn request_param_v3(ctx: &RequestContext) -> HandlerResult {
    let username: String = RequestParam::new("username").get(ctx.params())?;
    let member_a: i32 = RequestParam::new("memberA").get(ctx.params())?;

    tracing::info!("username={username}, age={member_a}");
    Ok(ok())
}

/// Plain `String` stays optional, a primitive `i32` cannot be absent
fn request_param_v4(ctx: &RequestContext) -> HandlerResult {
    let username: Option<String> = RequestParam::new("username").optional().bind(ctx.params())?;
    let member_a: i32 = RequestParam::new("memberA").get(ctx.params())?;

    tracing::info!("username={username:?}, age={member_a}");
    Ok(ok())
}

fn request_param_required(ctx: &RequestContext) -> HandlerResult {
    let username: String = RequestParam::new("username").get(ctx.params())?;
    let member_a: Option<i32> = RequestParam::new("memberA").optional().bind(ctx.params())?;

    tracing::info!("username={username}, age={member_a:?}");
    Ok(ok())
}

/// Absent or empty values fall back to the defaults
fn request_param_default(ctx: &RequestContext) -> HandlerResult {
    let username: String = RequestParam::new("username")
        .default_value("guest")
        .get(ctx.params())?;
    let member_a: i32 = RequestParam::new("memberA")
        .optional()
        .default_value("-1")
        .get(ctx.params())?;

    tracing::info!("username={username}, age={member_a}");
    Ok(ok())
}

#[allow(clippy::unnecessary_wraps)]
fn request_param_map(ctx: &RequestContext) -> HandlerResult {
    let param_map = ctx.params().to_map();

    tracing::info!(
        "username={:?}, age={:?}",
        param_map.get("username"),
        param_map.get("age")
    );
    Ok(ok())
}

fn model_attribute(ctx: &RequestContext) -> HandlerResult {
    let hello_data = HelloData::from_params(ctx.params())?;

    tracing::info!("username={}, age={}", hello_data.username, hello_data.age);
    tracing::debug!("helloData={hello_data:?}");
    Ok(ok())
}
