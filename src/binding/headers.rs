//! Header, cookie and locale binding

use std::collections::BTreeMap;

use hyper::header::{HeaderMap, ACCEPT_LANGUAGE, COOKIE};

use super::{resolve, FromParam};
use crate::error::RequestError;

/// Binder for one request header, matched case-insensitively
#[derive(Debug, Clone, Copy)]
pub struct RequestHeader<'a> {
    name: &'a str,
    required: bool,
    default_value: Option<&'a str>,
}

impl<'a> RequestHeader<'a> {
    pub const fn new(name: &'a str) -> Self {
        Self {
            name,
            required: true,
            default_value: None,
        }
    }

    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub const fn default_value(mut self, value: &'a str) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn bind<T: FromParam>(&self, headers: &HeaderMap) -> Result<Option<T>, RequestError> {
        let raw = headers.get(self.name).and_then(|v| v.to_str().ok());
        resolve(self.name, raw, self.required, self.default_value, |name| {
            RequestError::MissingHeader { name }
        })
    }
}

/// Binder for one cookie from the `Cookie` header(s)
#[derive(Debug, Clone, Copy)]
pub struct CookieValue<'a> {
    name: &'a str,
    required: bool,
}

impl<'a> CookieValue<'a> {
    pub const fn new(name: &'a str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn bind<T: FromParam>(&self, headers: &HeaderMap) -> Result<Option<T>, RequestError> {
        let raw = find_cookie(headers, self.name);
        resolve(self.name, raw, self.required, None, |name| {
            RequestError::MissingCookie { name }
        })
    }
}

/// Find a cookie value across all `Cookie` headers
fn find_cookie<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"'))
}

/// All headers as a multi-value map with lowercase names
pub fn header_map(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        map.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    map
}

/// Pick the preferred locale from `Accept-Language`, falling back to `default`
///
/// # Examples
/// ```
/// use hyper::header::{HeaderMap, HeaderValue};
/// use mvc_basic::binding::resolve_locale;
/// let mut headers = HeaderMap::new();
/// headers.insert("accept-language", HeaderValue::from_static("en;q=0.8, ko-KR"));
/// assert_eq!(resolve_locale(&headers, "en-US"), "ko-KR");
/// assert_eq!(resolve_locale(&HeaderMap::new(), "en-US"), "en-US");
/// ```
pub fn resolve_locale(headers: &HeaderMap, default: &str) -> String {
    let Some(value) = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()) else {
        return default.to_string();
    };

    let mut best: Option<(f32, &str)> = None;
    for item in value.split(',') {
        let mut parts = item.split(';');
        let tag = parts.next().unwrap_or_default().trim();
        if tag.is_empty() || tag == "*" {
            continue;
        }
        let q = parts
            .filter_map(|p| p.trim().strip_prefix("q="))
            .find_map(|q| q.parse::<f32>().ok())
            .unwrap_or(1.0);
        if q > 0.0 && best.map_or(true, |(best_q, _)| q > best_q) {
            best = Some((q, tag));
        }
    }

    best.map_or_else(|| default.to_string(), |(_, tag)| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_request_header_case_insensitive() {
        let map = headers(&[("host", "localhost:8080")]);
        let host: Option<String> = RequestHeader::new("HOST").bind(&map).unwrap();
        assert_eq!(host.as_deref(), Some("localhost:8080"));
    }

    #[test]
    fn test_request_header_missing() {
        let err = RequestHeader::new("host")
            .bind::<String>(&HeaderMap::new())
            .unwrap_err();
        assert!(matches!(err, RequestError::MissingHeader { .. }));

        let value: Option<String> = RequestHeader::new("x-mode")
            .default_value("normal")
            .bind(&HeaderMap::new())
            .unwrap();
        assert_eq!(value.as_deref(), Some("normal"));
    }

    #[test]
    fn test_cookie_lookup() {
        let map = headers(&[
            ("cookie", "theme=dark; myCookie=chip"),
            ("cookie", "session=\"abc\""),
        ]);
        let cookie: Option<String> = CookieValue::new("myCookie").bind(&map).unwrap();
        assert_eq!(cookie.as_deref(), Some("chip"));
        let session: Option<String> = CookieValue::new("session").bind(&map).unwrap();
        assert_eq!(session.as_deref(), Some("abc"));

        let absent: Option<String> = CookieValue::new("other").optional().bind(&map).unwrap();
        assert!(absent.is_none());
        assert!(CookieValue::new("other").bind::<String>(&map).is_err());
    }

    #[test]
    fn test_header_map_multi_value() {
        let map = header_map(&headers(&[
            ("accept", "text/html"),
            ("accept", "application/json"),
            ("host", "localhost"),
        ]));
        assert_eq!(map["accept"], vec!["text/html", "application/json"]);
        assert_eq!(map["host"], vec!["localhost"]);
    }

    #[test]
    fn test_resolve_locale_quality() {
        let map = headers(&[("accept-language", "ko-KR,ko;q=0.9,en-US;q=0.8")]);
        assert_eq!(resolve_locale(&map, "en-US"), "ko-KR");

        let map = headers(&[("accept-language", "*, fr;q=0")]);
        assert_eq!(resolve_locale(&map, "en-US"), "en-US");
    }
}
