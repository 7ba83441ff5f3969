//! Per-request context handed to every handler

use std::io::Read;

use hyper::body::{Buf, Bytes};
use hyper::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use hyper::{Method, Request, Uri};

use super::headers::resolve_locale;
use super::params::QueryParams;
use super::path::PathVariables;
use crate::error::RequestError;
use crate::http::MediaType;

/// A fully read request plus the inputs derived from it
///
/// Lives for a single request and is never shared between requests.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: QueryParams,
    path_variables: PathVariables,
    default_locale: String,
}

impl RequestContext {
    /// Build the context, decoding query parameters and, for form posts, the body
    pub fn new(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();

        let mut params = QueryParams::parse(parts.uri.query().unwrap_or_default());
        let is_form = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(MediaType::parse)
            .is_some_and(|media| media == MediaType::APPLICATION_FORM_URLENCODED);
        if is_form {
            params.extend_from(&body);
        }

        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params,
            path_variables: PathVariables::default(),
            default_locale: "en-US".to_string(),
        }
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: &str) -> Self {
        locale.clone_into(&mut self.default_locale);
        self
    }

    pub(crate) fn set_path_variables(&mut self, vars: PathVariables) {
        self.path_variables = vars;
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    pub const fn params(&self) -> &QueryParams {
        &self.params
    }

    pub const fn path_variables(&self) -> &PathVariables {
        &self.path_variables
    }

    /// Request `Content-Type`; a missing header reads as `application/octet-stream`
    pub fn content_type(&self) -> Result<MediaType, RequestError> {
        let Some(value) = self.headers.get(CONTENT_TYPE) else {
            return Ok(MediaType::APPLICATION_OCTET_STREAM);
        };
        let raw = String::from_utf8_lossy(value.as_bytes());
        MediaType::parse(&raw).ok_or_else(|| RequestError::UnsupportedMediaType {
            content_type: raw.into_owned(),
        })
    }

    /// Media types from `Accept`, preferred first; `None` if the header is malformed
    pub fn accepted(&self) -> Option<Vec<MediaType>> {
        let values: Vec<&str> = self
            .headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if values.iter().all(|v| v.trim().is_empty()) {
            return Some(vec![MediaType::ALL]);
        }
        MediaType::parse_list(&values.join(","))
    }

    /// Whether the client accepts a response of the given media type
    pub fn accepts(&self, media: &MediaType) -> bool {
        self.accepted()
            .is_some_and(|list| list.iter().any(|accepted| accepted.is_compatible_with(media)))
    }

    /// Preferred locale from `Accept-Language`
    pub fn locale(&self) -> String {
        resolve_locale(&self.headers, &self.default_locale)
    }

    /// Raw body decoded as UTF-8 text
    pub fn body_text(&self) -> Result<String, RequestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| RequestError::InvalidBody(format!("body is not valid UTF-8: {e}")))
    }

    /// Raw body as a blocking reader over the buffered bytes
    pub fn body_reader(&self) -> impl Read {
        self.body.clone().reader()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(builder: hyper::http::request::Builder, body: &'static str) -> RequestContext {
        RequestContext::new(builder.body(Bytes::from_static(body.as_bytes())).unwrap())
    }

    #[test]
    fn test_query_params() {
        let ctx = request(Request::get("/request-param-v1?username=hello&age=20"), "");
        assert_eq!(ctx.path(), "/request-param-v1");
        assert_eq!(ctx.params().first("username"), Some("hello"));
        assert_eq!(ctx.params().first("age"), Some("20"));
    }

    #[test]
    fn test_form_body_follows_query() {
        let ctx = request(
            Request::post("/request-param-v1?username=query")
                .header("content-type", "application/x-www-form-urlencoded; charset=UTF-8"),
            "username=form&age=30",
        );
        assert_eq!(ctx.params().all("username"), vec!["query", "form"]);
        assert_eq!(ctx.params().first("age"), Some("30"));
    }

    #[test]
    fn test_json_body_is_not_params() {
        let ctx = request(
            Request::post("/request-body-json-v1").header("content-type", "application/json"),
            "username=form",
        );
        assert!(ctx.params().is_empty());
    }

    #[test]
    fn test_content_type() {
        let ctx = request(Request::post("/"), "");
        assert_eq!(ctx.content_type().unwrap(), MediaType::APPLICATION_OCTET_STREAM);

        let ctx = request(Request::post("/").header("content-type", "bogus"), "");
        assert!(matches!(
            ctx.content_type(),
            Err(RequestError::UnsupportedMediaType { .. })
        ));
    }

    #[test]
    fn test_accepts() {
        let ctx = request(Request::get("/"), "");
        assert!(ctx.accepts(&MediaType::APPLICATION_JSON));

        let ctx = request(Request::get("/").header("accept", "text/html"), "");
        assert!(!ctx.accepts(&MediaType::APPLICATION_JSON));
        assert!(ctx.accepts(&MediaType::TEXT_HTML));

        let ctx = request(Request::get("/").header("accept", "application/*"), "");
        assert!(ctx.accepts(&MediaType::APPLICATION_JSON));
    }

    #[test]
    fn test_body_text_and_reader() {
        let ctx = request(Request::post("/"), "hello");
        assert_eq!(ctx.body_text().unwrap(), "hello");

        let mut text = String::new();
        ctx.body_reader().read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello");

        let invalid = RequestContext::new(
            Request::post("/")
                .body(Bytes::from_static(&[0xff, 0xfe]))
                .unwrap(),
        );
        assert!(matches!(invalid.body_text(), Err(RequestError::InvalidBody(_))));
    }

    #[test]
    fn test_locale_default() {
        let ctx = request(Request::get("/headers"), "").with_default_locale("ko-KR");
        assert_eq!(ctx.locale(), "ko-KR");
    }
}
