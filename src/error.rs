//! Request error module
//!
//! Every failure on the request path is a `RequestError`. Each variant maps to
//! exactly one HTTP status and is rendered as a JSON error body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use thiserror::Error;

use crate::http;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("No route matches the request path")]
    NotFound,

    #[error("Request method is not supported; allowed: {}", join_methods(.allowed))]
    MethodNotAllowed { allowed: Vec<Method> },

    #[error("Parameter conditions \"{conditions}\" not met for actual request parameters")]
    UnsatisfiedParams { conditions: String },

    #[error("Content type '{content_type}' not supported")]
    UnsupportedMediaType { content_type: String },

    #[error("Could not find acceptable representation")]
    NotAcceptable,

    #[error("Required request parameter '{name}' is not present")]
    MissingParameter { name: String },

    #[error("Required request header '{name}' is not present")]
    MissingHeader { name: String },

    #[error("Required cookie '{name}' is not present")]
    MissingCookie { name: String },

    #[error("Missing URI template variable '{name}'")]
    MissingPathVariable { name: String },

    #[error("Failed to convert value '{value}' of '{name}' to required type '{target}'")]
    TypeMismatch {
        name: String,
        value: String,
        target: &'static str,
    },

    #[error("Request body is not readable: {0}")]
    InvalidBody(String),

    #[error("JSON parse error: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Request body exceeds the limit of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("Failed to write JSON response: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl RequestError {
    /// HTTP status reported to the caller
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingPathVariable { .. } | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::UnsatisfiedParams { .. }
            | Self::MissingParameter { .. }
            | Self::MissingHeader { .. }
            | Self::MissingCookie { .. }
            | Self::TypeMismatch { .. }
            | Self::InvalidBody(_)
            | Self::MalformedJson(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Render the error as a response for the given request path
    pub fn into_response(self, path: &str) -> Response<Full<Bytes>> {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{} {path}: {self}", status.as_u16());
        } else {
            tracing::debug!("{} {path}: {self}", status.as_u16());
        }

        let mut response = http::build_error_response(status, &self.to_string(), path);
        if let Self::MethodNotAllowed { allowed } = &self {
            if let Ok(value) = join_methods(allowed).parse() {
                response.headers_mut().insert(hyper::header::ALLOW, value);
            }
        }
        response
    }
}

/// Join methods as an `Allow` header value
pub fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
