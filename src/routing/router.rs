//! Request dispatch module
//!
//! Narrows the route table stage by stage (path, method, params, headers,
//! consumes, produces) and reports the stage that left no candidate.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Method, Request, Response};

use super::matcher::{
    match_consumes, match_headers, match_params, match_produces, negotiate_produces,
};
use super::route::{Route, RouteSpec};
use super::RouteError;
use crate::binding::{PathVariables, RequestContext};
use crate::error::{join_methods, RequestError};
use crate::http;

/// Methods advertised for routes that accept any method
const ANY_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// Dispatch settings taken from the HTTP configuration
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub default_locale: String,
    pub enable_cors: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
            enable_cors: false,
        }
    }
}

/// Compiled, immutable route table
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
    options: RouterOptions,
}

/// Outcome of route selection
enum Selection<'r> {
    Handler(&'r Route, PathVariables),
    Options(Vec<Method>),
}

struct Candidate<'r> {
    route: &'r Route,
    vars: PathVariables,
    variable_count: usize,
}

impl Router {
    pub fn new(specs: &[RouteSpec], options: RouterOptions) -> Result<Self, RouteError> {
        let routes = specs
            .iter()
            .map(Route::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes, options })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Dispatch a fully read request to exactly one handler
    pub fn dispatch(&self, request: Request<Bytes>) -> Response<Full<Bytes>> {
        let mut ctx = RequestContext::new(request).with_default_locale(&self.options.default_locale);
        let path = ctx.path().to_string();
        let is_head = *ctx.method() == Method::HEAD;

        let (route, vars) = match self.select(&ctx) {
            Ok(Selection::Handler(route, vars)) => (route, vars),
            Ok(Selection::Options(allowed)) => {
                return http::build_options_response(
                    &join_methods(&allowed),
                    self.options.enable_cors,
                );
            }
            Err(e) => return e.into_response(&path),
        };

        tracing::debug!("{} {path} -> {}", ctx.method(), route.name);
        ctx.set_path_variables(vars);

        match (route.handler)(&ctx) {
            Ok(mut response) => {
                if response.status().is_success() {
                    apply_produces(route, &ctx, &mut response);
                }
                if is_head {
                    strip_body(&mut response);
                }
                response
            }
            Err(e) => e.into_response(&path),
        }
    }

    fn select(&self, ctx: &RequestContext) -> Result<Selection<'_>, RequestError> {
        let path = ctx.path();
        let method = ctx.method();

        // 1. Path
        let candidates: Vec<Candidate<'_>> = self
            .routes
            .iter()
            .filter_map(|route| {
                route.patterns.iter().find_map(|pattern| {
                    pattern.matches(path).map(|vars| Candidate {
                        route,
                        vars,
                        variable_count: pattern.variable_count(),
                    })
                })
            })
            .collect();
        if candidates.is_empty() {
            return Err(RequestError::NotFound);
        }

        // 2. Method, with automatic OPTIONS
        if *method == Method::OPTIONS && !candidates.iter().any(|c| c.route.handles_options()) {
            return Ok(Selection::Options(allowed_methods(&candidates)));
        }
        let (candidates, rejected): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(|c| c.route.allows(method));
        if candidates.is_empty() {
            return Err(RequestError::MethodNotAllowed {
                allowed: allowed_methods(&rejected),
            });
        }

        // 3. Params
        let (candidates, rejected): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| match_params(&c.route.params, ctx.params()));
        if candidates.is_empty() {
            let conditions = rejected
                .iter()
                .flat_map(|c| c.route.params.iter().map(ToString::to_string))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(RequestError::UnsatisfiedParams { conditions });
        }

        // 4. Headers
        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|c| match_headers(&c.route.headers, ctx.headers()))
            .collect();
        if candidates.is_empty() {
            return Err(RequestError::NotFound);
        }

        // 5. Consumes
        let content_type = ctx.content_type();
        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|c| match_consumes(&c.route.consumes, content_type.as_ref().ok()))
            .collect();
        if candidates.is_empty() {
            return Err(match content_type {
                Ok(media) => RequestError::UnsupportedMediaType {
                    content_type: media.to_string(),
                },
                Err(e) => e,
            });
        }

        // 6. Produces
        let accepted = ctx.accepted();
        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|c| match_produces(&c.route.produces, accepted.as_deref()))
            .collect();

        // Most specific pattern wins, then registration order
        candidates
            .into_iter()
            .min_by_key(|c| c.variable_count)
            .map(|c| Selection::Handler(c.route, c.vars))
            .ok_or(RequestError::NotAcceptable)
    }
}

/// Methods served by the given candidates, in a stable order
fn allowed_methods(candidates: &[Candidate<'_>]) -> Vec<Method> {
    let mut allowed: Vec<Method> = Vec::new();
    let mut push = |method: &Method| {
        if !allowed.contains(method) {
            allowed.push(method.clone());
        }
    };

    for candidate in candidates {
        let methods = &candidate.route.methods;
        if methods.is_empty() {
            ANY_METHODS.iter().for_each(&mut push);
        } else {
            for method in methods {
                push(method);
                if *method == Method::GET {
                    push(&Method::HEAD);
                }
            }
        }
    }
    push(&Method::OPTIONS);
    allowed
}

/// Use the negotiated `produces` type as the response content type
fn apply_produces(route: &Route, ctx: &RequestContext, response: &mut Response<Full<Bytes>>) {
    let Some(accepted) = ctx.accepted() else {
        return;
    };
    if let Some(media) = negotiate_produces(&route.produces, &accepted) {
        if let Ok(value) = HeaderValue::from_str(&media.to_content_type()) {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }
    }
}

/// Drop the body of a HEAD response, keeping the length the GET would have sent
fn strip_body(response: &mut Response<Full<Bytes>>) {
    let length = response.body().size_hint().exact().unwrap_or(0);
    response
        .headers_mut()
        .insert(CONTENT_LENGTH, HeaderValue::from(length));
    *response.body_mut() = Full::new(Bytes::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{PathVariable, RequestParam};
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    type HandlerResult = Result<Response<Full<Bytes>>, RequestError>;

    #[allow(clippy::unnecessary_wraps)]
    fn named(_: &RequestContext) -> HandlerResult {
        Ok(http::build_text_response(StatusCode::OK, "named"))
    }

    fn variable(ctx: &RequestContext) -> HandlerResult {
        let id: String = PathVariable::new("id").bind(ctx.path_variables())?;
        Ok(http::build_text_response(StatusCode::OK, format!("var:{id}")))
    }

    fn echo_age(ctx: &RequestContext) -> HandlerResult {
        let age: i32 = RequestParam::new("age").get(ctx.params())?;
        Ok(http::build_text_response(StatusCode::OK, age.to_string()))
    }

    #[allow(clippy::unnecessary_wraps)]
    fn ok(_: &RequestContext) -> HandlerResult {
        Ok(http::build_text_response(StatusCode::OK, "ok"))
    }

    fn router() -> Router {
        let specs = vec![
            RouteSpec::get("variable", "/items/{id}", variable),
            RouteSpec::get("named", "/items/named", named),
            RouteSpec::request("echo", "/echo", echo_age),
            RouteSpec::get("param", "/param", ok).params("mode=debug"),
            RouteSpec::get("header", "/header", ok).headers("mode=debug"),
            RouteSpec::post("consume", "/consume", ok).consumes("application/json"),
            RouteSpec::post("produce", "/produce", ok).produces("text/html"),
        ];
        Router::new(&specs, RouterOptions::default()).unwrap()
    }

    fn send(router: &Router, request: hyper::http::request::Builder) -> Response<Full<Bytes>> {
        router.dispatch(request.body(Bytes::new()).unwrap())
    }

    async fn body(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_literal_beats_variable() {
        let router = router();
        assert_eq!(body(send(&router, Request::get("/items/named"))).await, "named");
        assert_eq!(body(send(&router, Request::get("/items/42"))).await, "var:42");
    }

    #[test]
    fn test_not_found() {
        let response = send(&router(), Request::get("/missing"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_method_not_allowed() {
        let response = send(&router(), Request::post("/items/named"));
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get("allow").unwrap(), "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_automatic_options() {
        let response = send(&router(), Request::options("/echo"));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get("allow").unwrap(),
            "GET, HEAD, POST, PUT, PATCH, DELETE, OPTIONS"
        );
    }

    #[tokio::test]
    async fn test_head_strips_body() {
        let response = send(&router(), Request::head("/items/named"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-length").unwrap(), "5");
        assert_eq!(body(response).await, "");
    }

    #[test]
    fn test_param_condition() {
        let router = router();
        assert_eq!(
            send(&router, Request::get("/param?mode=debug")).status(),
            StatusCode::OK
        );
        assert_eq!(
            send(&router, Request::get("/param?mode=release")).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_header_condition() {
        let router = router();
        assert_eq!(
            send(&router, Request::get("/header").header("mode", "debug")).status(),
            StatusCode::OK
        );
        assert_eq!(
            send(&router, Request::get("/header")).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_consumes_condition() {
        let router = router();
        assert_eq!(
            send(
                &router,
                Request::post("/consume").header("content-type", "application/json")
            )
            .status(),
            StatusCode::OK
        );
        assert_eq!(
            send(
                &router,
                Request::post("/consume").header("content-type", "text/plain")
            )
            .status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            send(&router, Request::post("/consume")).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_produces_condition() {
        let router = router();
        let response = send(&router, Request::post("/produce").header("accept", "text/html"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            send(
                &router,
                Request::post("/produce").header("accept", "application/json")
            )
            .status(),
            StatusCode::NOT_ACCEPTABLE
        );
    }

    #[test]
    fn test_handler_errors_become_status() {
        let router = router();
        assert_eq!(
            send(&router, Request::get("/echo")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            send(&router, Request::get("/echo?age=x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            send(&router, Request::get("/echo?age=7")).status(),
            StatusCode::OK
        );
    }

    #[test]
    fn test_invalid_table() {
        let specs = vec![RouteSpec::get("bad", "/a/{x}/{x}", ok)];
        assert!(Router::new(&specs, RouterOptions::default()).is_err());
    }
}
