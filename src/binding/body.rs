//! Request body binding
//!
//! Three independent modes: raw text, raw text decoded as JSON by the
//! handler, and JSON bound directly when the request declares a JSON
//! content type.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::context::RequestContext;
use crate::error::RequestError;
use crate::http::response::TEXT_PLAIN_UTF8;

/// Decode JSON text into an entity, regardless of the request content type
pub fn decode_json<T: DeserializeOwned>(text: &str) -> Result<T, RequestError> {
    serde_json::from_str(text).map_err(RequestError::MalformedJson)
}

/// Decode the request body as JSON; the request must declare a JSON content type
pub fn request_body_json<T: DeserializeOwned>(ctx: &RequestContext) -> Result<T, RequestError> {
    let content_type = ctx.content_type()?;
    if !content_type.is_json() {
        return Err(RequestError::UnsupportedMediaType {
            content_type: content_type.to_string(),
        });
    }
    serde_json::from_slice(ctx.body()).map_err(RequestError::MalformedJson)
}

/// Headers plus a body, usable both as a handler input and as a handler output
#[derive(Debug, Clone)]
pub struct HttpEntity<T> {
    headers: HeaderMap,
    body: T,
}

impl<T> HttpEntity<T> {
    pub fn new(body: T) -> Self {
        Self {
            headers: HeaderMap::new(),
            body,
        }
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub const fn body(&self) -> &T {
        &self.body
    }
}

impl HttpEntity<String> {
    /// Read the request body as text together with the request headers
    pub fn text(ctx: &RequestContext) -> Result<Self, RequestError> {
        Ok(Self {
            headers: ctx.headers().clone(),
            body: ctx.body_text()?,
        })
    }
}

impl<T: DeserializeOwned> HttpEntity<T> {
    /// Read the request body as a JSON entity together with the request headers
    pub fn json(ctx: &RequestContext) -> Result<Self, RequestError> {
        Ok(Self {
            headers: ctx.headers().clone(),
            body: request_body_json(ctx)?,
        })
    }
}

impl<T: Into<Bytes>> HttpEntity<T> {
    /// Write the entity as a 200 response
    pub fn into_response(self) -> Response<Full<Bytes>> {
        ResponseEntity {
            entity: self,
            status: StatusCode::OK,
        }
        .into_response()
    }
}

/// An `HttpEntity` carrying an explicit response status
#[derive(Debug, Clone)]
pub struct ResponseEntity<T> {
    entity: HttpEntity<T>,
    status: StatusCode,
}

impl<T> ResponseEntity<T> {
    pub fn new(body: T, status: StatusCode) -> Self {
        Self {
            entity: HttpEntity::new(body),
            status,
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Into<Bytes>> ResponseEntity<T> {
    /// Write the entity with its status; text/plain unless a content type was set
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.entity.body.into()));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8));
        response.headers_mut().extend(self.entity.headers);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HelloData;
    use hyper::Request;

    fn ctx(content_type: Option<&'static str>, body: &'static str) -> RequestContext {
        let mut builder = Request::post("/request-body-json-v3");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        RequestContext::new(builder.body(Bytes::from_static(body.as_bytes())).unwrap())
    }

    #[test]
    fn test_decode_json() {
        let data: HelloData = decode_json(r#"{"username":"hello","age":20}"#).unwrap();
        assert_eq!(data, HelloData::new("hello", 20));
        assert!(matches!(
            decode_json::<HelloData>("{not json"),
            Err(RequestError::MalformedJson(_))
        ));
    }

    #[test]
    fn test_request_body_json_requires_json_content_type() {
        let body = r#"{"username":"hello","age":20}"#;
        let data: HelloData = request_body_json(&ctx(Some("application/json"), body)).unwrap();
        assert_eq!(data, HelloData::new("hello", 20));

        let vendor: HelloData =
            request_body_json(&ctx(Some("application/vnd.hello+json"), body)).unwrap();
        assert_eq!(vendor.age, 20);

        assert!(matches!(
            request_body_json::<HelloData>(&ctx(Some("text/plain"), body)),
            Err(RequestError::UnsupportedMediaType { .. })
        ));
        assert!(matches!(
            request_body_json::<HelloData>(&ctx(None, body)),
            Err(RequestError::UnsupportedMediaType { .. })
        ));
    }

    #[test]
    fn test_request_body_json_rejects_out_of_range_age() {
        let result = request_body_json::<HelloData>(&ctx(
            Some("application/json"),
            r#"{"username":"hello","age":3000000000}"#,
        ));
        assert!(matches!(result, Err(RequestError::MalformedJson(_))));
    }

    #[test]
    fn test_entity_text_and_response() {
        let entity = HttpEntity::text(&ctx(Some("text/plain"), "hello")).unwrap();
        assert_eq!(entity.body(), "hello");
        assert_eq!(entity.headers().get("content-type").unwrap(), "text/plain");

        let response = HttpEntity::new("ok").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            TEXT_PLAIN_UTF8
        );
    }

    #[test]
    fn test_response_entity_keeps_status() {
        let entity = ResponseEntity::new("created", StatusCode::CREATED);
        assert_eq!(entity.status(), StatusCode::CREATED);

        let response = entity.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            TEXT_PLAIN_UTF8
        );
    }
}
