//! Request handler module
//!
//! The hyper entry point plus the endpoint groups. Each group contributes its
//! `RouteSpec`s; `routes()` assembles them in registration order.

mod mapping;
mod request_body_json;
mod request_body_string;
mod request_header;
mod request_param;
mod response_body;
pub mod router;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::HttpConfig;
use crate::error::RequestError;
use crate::http;
use crate::routing::{RouteError, RouteSpec, Router, RouterOptions};

// Re-export main entry point
pub use router::handle_request;

/// Result type of every endpoint
pub type HandlerResult = Result<Response<Full<Bytes>>, RequestError>;

/// The plain `ok` reply most endpoints send
fn ok() -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, "ok")
}

/// The full route table
pub fn routes() -> Vec<RouteSpec> {
    [
        log_test::routes(),
        request_param::routes(),
        request_body_string::routes(),
        request_body_json::routes(),
        request_header::routes(),
        response_body::routes(),
        mapping::routes(),
    ]
    .concat()
}

/// Compile the route table with the HTTP settings
pub fn build_router(config: &HttpConfig) -> Result<Router, RouteError> {
    Router::new(
        &routes(),
        RouterOptions {
            default_locale: config.default_locale.clone(),
            enable_cors: config.enable_cors,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table_compiles() {
        let router = Router::new(&routes(), RouterOptions::default()).unwrap();
        assert_eq!(router.routes().len(), routes().len());
        assert!(router.routes().iter().any(|r| r.name == "hello-basic"));
    }
}
