//! Request mapping endpoints
//!
//! Exercise the route conditions: multiple paths, path variables, and
//! param, header, consumes and produces constraints.

use super::{ok, HandlerResult};
use crate::binding::{PathVariable, RequestContext};
use crate::routing::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("hello-basic", "/hello-basic", hello_basic).path("/hello-go"),
        RouteSpec::get("mapping-get-v1", "/mapping-get-v1", mapping_get_v1),
        RouteSpec::get("mapping-get-v2", "/mapping-get-v2", mapping_get_v2),
        RouteSpec::get("mapping-path", "/mapping/{userId}", mapping_path),
        RouteSpec::get(
            "mapping-path-orders",
            "/mapping/users/{userId}/orders/{orderId}",
            mapping_path_orders,
        ),
        RouteSpec::get("mapping-param", "/mapping-param", mapping_param).params("mode=debug"),
        RouteSpec::get("mapping-header", "/mapping-header", mapping_header).headers("mode=debug"),
        RouteSpec::post("mapping-consume", "/mapping-consume", mapping_consumes)
            .consumes("application/json"),
        RouteSpec::post("mapping-produce", "/mapping-produce", mapping_produces)
            .produces("text/html"),
    ]
}

#[allow(clippy::unnecessary_wraps)]
fn hello_basic(_ctx: &RequestContext) -> HandlerResult {
    tracing::info!("helloBasic");
    Ok(ok())
}

#[allow(clippy::unnecessary_wraps)]
fn mapping_get_v1(_ctx: &RequestContext) -> HandlerResult {
    tracing::info!("mappingGetV1");
    Ok(ok())
}

#[allow(clippy::unnecessary_wraps)]
fn mapping_get_v2(_ctx: &RequestContext) -> HandlerResult {
    tracing::info!("mappingGetV2");
    Ok(ok())
}

fn mapping_path(ctx: &RequestContext) -> HandlerResult {
    let data: String = PathVariable::new("userId").bind(ctx.path_variables())?;

    tracing::info!("mappingPath userId={data}");
    Ok(ok())
}

fn mapping_path_orders(ctx: &RequestContext) -> HandlerResult {
    let user_id: String = PathVariable::new("userId").bind(ctx.path_variables())?;
    let order_id: i64 = PathVariable::new("orderId").bind(ctx.path_variables())?;

    tracing::info!("mappingPath userId={user_id}, orderId={order_id}");
    Ok(ok())
}

#[allow(clippy::unnecessary_wraps)]
fn mapping_param(_ctx: &RequestContext) -> HandlerResult {
    tracing::info!("mappingParam");
    Ok(ok())
}

#[allow(clippy::unnecessary_wraps)]
fn mapping_header(_ctx: &RequestContext) -> HandlerResult {
    tracing::info!("mappingHeader");
    Ok(ok())
}

#[allow(clippy::unnecessary_wraps)]
fn mapping_consumes(_ctx: &RequestContext) -> HandlerResult {
    tracing::info!("mappingConsumes");
    Ok(ok())
}

#[allow(clippy::unnecessary_wraps)]
fn mapping_produces(_ctx: &RequestContext) -> HandlerResult {
    tracing::info!("mappingProduces");
    Ok(ok())
}
