//! Media type module
//!
//! Parses `Content-Type` and `Accept` values and answers the compatibility
//! questions the dispatcher and the JSON binders need.

use std::borrow::Cow;
use std::fmt;

/// A `type/subtype` pair, parameters dropped, lowercase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    kind: Cow<'static, str>,
    subtype: Cow<'static, str>,
}

impl MediaType {
    pub const ALL: Self = Self::from_static("*", "*");
    pub const APPLICATION_JSON: Self = Self::from_static("application", "json");
    pub const APPLICATION_FORM_URLENCODED: Self =
        Self::from_static("application", "x-www-form-urlencoded");
    pub const APPLICATION_OCTET_STREAM: Self = Self::from_static("application", "octet-stream");
    pub const TEXT_PLAIN: Self = Self::from_static("text", "plain");
    pub const TEXT_HTML: Self = Self::from_static("text", "html");

    const fn from_static(kind: &'static str, subtype: &'static str) -> Self {
        Self {
            kind: Cow::Borrowed(kind),
            subtype: Cow::Borrowed(subtype),
        }
    }

    /// Parse a single media type, ignoring parameters
    ///
    /// # Examples
    /// ```
    /// use mvc_basic::http::MediaType;
    /// let media = MediaType::parse("Application/JSON; charset=UTF-8").unwrap();
    /// assert_eq!(media, MediaType::APPLICATION_JSON);
    /// assert!(MediaType::parse("json").is_none());
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let essence = value.split(';').next()?.trim();
        if essence == "*" {
            return Some(Self::ALL);
        }
        let (kind, subtype) = essence.split_once('/')?;
        let (kind, subtype) = (kind.trim(), subtype.trim());
        if kind.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return None;
        }
        // "*/json" is not a valid media type
        if kind == "*" && subtype != "*" {
            return None;
        }
        Some(Self {
            kind: Cow::Owned(kind.to_ascii_lowercase()),
            subtype: Cow::Owned(subtype.to_ascii_lowercase()),
        })
    }

    /// Parse a comma separated list such as an `Accept` header, highest quality first
    ///
    /// Returns `None` if any element is malformed.
    pub fn parse_list(value: &str) -> Option<Vec<Self>> {
        let mut weighted = Vec::new();
        for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let media = Self::parse(item)?;
            weighted.push((quality(item), media));
        }
        // Stable sort keeps header order for equal weights
        weighted.sort_by(|a, b| b.0.total_cmp(&a.0));
        Some(
            weighted
                .into_iter()
                .filter(|(q, _)| *q > 0.0)
                .map(|(_, media)| media)
                .collect(),
        )
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.kind == "*"
    }

    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == "*" || self.subtype.starts_with("*+")
    }

    pub fn is_concrete(&self) -> bool {
        !self.is_wildcard_type() && !self.is_wildcard_subtype()
    }

    /// Whether `other` is included in this (possibly wildcard) media type
    pub fn includes(&self, other: &Self) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        if self.kind != other.kind {
            return false;
        }
        if self.subtype == other.subtype || self.subtype == "*" {
            return true;
        }
        // application/*+json includes application/vnd.api+json
        if let Some(suffix) = self.subtype.strip_prefix("*+") {
            return other
                .subtype
                .rsplit_once('+')
                .is_some_and(|(_, other_suffix)| other_suffix == suffix);
        }
        false
    }

    /// Symmetric version of [`MediaType::includes`]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.includes(other) || other.includes(self)
    }

    /// Whether this media type carries JSON (`application/json` or `*/*+json`)
    pub fn is_json(&self) -> bool {
        (self.kind == "application" && self.subtype == "json") || self.subtype.ends_with("+json")
    }

    /// Render as a `Content-Type` value, adding a UTF-8 charset for text types
    pub fn to_content_type(&self) -> String {
        if self.kind == "text" {
            format!("{self}; charset=utf-8")
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)
    }
}

/// Extract the `q` parameter of a media range, defaulting to 1.0
fn quality(item: &str) -> f32 {
    item.split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
        .and_then(|(_, value)| value.trim().parse::<f32>().ok())
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            MediaType::parse("application/json"),
            Some(MediaType::APPLICATION_JSON)
        );
        assert_eq!(
            MediaType::parse("text/html;charset=UTF-8"),
            Some(MediaType::TEXT_HTML)
        );
        assert_eq!(MediaType::parse("*"), Some(MediaType::ALL));
        assert!(MediaType::parse("").is_none());
        assert!(MediaType::parse("text").is_none());
        assert!(MediaType::parse("*/json").is_none());
        assert!(MediaType::parse("a/b/c").is_none());
    }

    #[test]
    fn test_includes_wildcards() {
        let any = MediaType::ALL;
        let app_any = MediaType::parse("application/*").unwrap();
        let json = MediaType::APPLICATION_JSON;
        assert!(any.includes(&json));
        assert!(app_any.includes(&json));
        assert!(!json.includes(&app_any));
        assert!(json.is_compatible_with(&app_any));
        assert!(!MediaType::TEXT_HTML.is_compatible_with(&json));
    }

    #[test]
    fn test_suffix_pattern() {
        let pattern = MediaType::parse("application/*+json").unwrap();
        let vendor = MediaType::parse("application/vnd.api+json").unwrap();
        assert!(pattern.includes(&vendor));
        assert!(!pattern.includes(&MediaType::parse("application/xml").unwrap()));
        assert!(vendor.is_json());
    }

    #[test]
    fn test_parse_list_orders_by_quality() {
        let list = MediaType::parse_list("text/plain;q=0.5, application/json, text/html;q=0")
            .unwrap();
        assert_eq!(list, vec![MediaType::APPLICATION_JSON, MediaType::TEXT_PLAIN]);
        assert!(MediaType::parse_list("text/plain, garbage").is_none());
    }

    #[test]
    fn test_to_content_type() {
        assert_eq!(
            MediaType::TEXT_HTML.to_content_type(),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            MediaType::APPLICATION_JSON.to_content_type(),
            "application/json"
        );
    }
}
