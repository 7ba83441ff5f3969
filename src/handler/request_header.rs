//! Request metadata endpoint: method, locale, headers and cookies

use super::{ok, HandlerResult};
use crate::binding::{header_map, CookieValue, RequestContext, RequestHeader};
use crate::routing::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![RouteSpec::request("headers", "/headers", headers)]
}

fn headers(ctx: &RequestContext) -> HandlerResult {
    let host: Option<String> = RequestHeader::new("host").bind(ctx.headers())?;
    let cookie: Option<String> = CookieValue::new("myCookie").optional().bind(ctx.headers())?;

    tracing::info!("httpMethod={}", ctx.method());
    tracing::info!("locale={}", ctx.locale());
    tracing::info!("headerMap={:?}", header_map(ctx.headers()));
    tracing::info!("header host={}", host.unwrap_or_default());
    tracing::info!("myCookie={cookie:?}");
    Ok(ok())
}
