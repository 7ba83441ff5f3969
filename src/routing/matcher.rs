//! Route condition matching module
//!
//! Implements the narrowing conditions a route can declare on top of its
//! path: parameter and header expressions, and consumable/producible media
//! types.

use hyper::header::HeaderMap;

use super::RouteError;
use crate::binding::QueryParams;
use crate::http::MediaType;

/// `name`, `!name`, `name=value` or `name!=value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValueExpression {
    Present(String),
    Absent(String),
    Equals(String, String),
    NotEquals(String, String),
}

impl NameValueExpression {
    pub fn parse(expression: &str) -> Result<Self, RouteError> {
        let expression = expression.trim();
        let parsed = if let Some((name, value)) = expression.split_once("!=") {
            Self::NotEquals(name.trim().to_string(), value.trim().to_string())
        } else if let Some((name, value)) = expression.split_once('=') {
            Self::Equals(name.trim().to_string(), value.trim().to_string())
        } else if let Some(name) = expression.strip_prefix('!') {
            Self::Absent(name.trim().to_string())
        } else {
            Self::Present(expression.to_string())
        };

        if parsed.name().is_empty() {
            return Err(RouteError::InvalidExpression(expression.to_string()));
        }
        Ok(parsed)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Present(name)
            | Self::Absent(name)
            | Self::Equals(name, _)
            | Self::NotEquals(name, _) => name,
        }
    }

    /// Evaluate against the value found under this expression's name
    fn matches_value(&self, value: Option<&str>) -> bool {
        match self {
            Self::Present(_) => value.is_some(),
            Self::Absent(_) => value.is_none(),
            Self::Equals(_, expected) => value == Some(expected.as_str()),
            // An absent input is also "not equal"
            Self::NotEquals(_, expected) => value != Some(expected.as_str()),
        }
    }
}

impl std::fmt::Display for NameValueExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present(name) => write!(f, "{name}"),
            Self::Absent(name) => write!(f, "!{name}"),
            Self::Equals(name, value) => write!(f, "{name}={value}"),
            Self::NotEquals(name, value) => write!(f, "{name}!={value}"),
        }
    }
}

/// Check if request parameters satisfy all expressions
pub fn match_params(expressions: &[NameValueExpression], params: &QueryParams) -> bool {
    expressions
        .iter()
        .all(|expr| expr.matches_value(params.first(expr.name())))
}

/// Check if headers satisfy all expressions; names are case-insensitive, values exact
pub fn match_headers(expressions: &[NameValueExpression], headers: &HeaderMap) -> bool {
    expressions.iter().all(|expr| {
        let value = headers.get(expr.name()).and_then(|v| v.to_str().ok());
        expr.matches_value(value)
    })
}

/// A media type, optionally negated with a leading `!`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypeExpression {
    pub media: MediaType,
    pub negated: bool,
}

impl MediaTypeExpression {
    pub fn parse(expression: &str) -> Result<Self, RouteError> {
        let expression = expression.trim();
        let (negated, raw) = match expression.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, expression),
        };
        let media = MediaType::parse(raw)
            .ok_or_else(|| RouteError::InvalidMediaType(expression.to_string()))?;
        Ok(Self { media, negated })
    }
}

/// Check the request content type against `consumes`; empty means anything
pub fn match_consumes(expressions: &[MediaTypeExpression], content_type: Option<&MediaType>) -> bool {
    if expressions.is_empty() {
        return true;
    }
    // An unparseable content type satisfies no condition
    let Some(content_type) = content_type else {
        return false;
    };
    expressions
        .iter()
        .any(|expr| expr.media.includes(content_type) != expr.negated)
}

/// Check accepted media types against `produces`; empty means anything
pub fn match_produces(expressions: &[MediaTypeExpression], accepted: Option<&[MediaType]>) -> bool {
    if expressions.is_empty() {
        return true;
    }
    let Some(accepted) = accepted else {
        return false;
    };
    expressions.iter().any(|expr| {
        let compatible = accepted.iter().any(|a| expr.media.is_compatible_with(a));
        compatible != expr.negated
    })
}

/// First concrete producible type the client accepts, used as the response type
pub fn negotiate_produces<'a>(
    expressions: &'a [MediaTypeExpression],
    accepted: &[MediaType],
) -> Option<&'a MediaType> {
    expressions
        .iter()
        .filter(|expr| !expr.negated && expr.media.is_concrete())
        .map(|expr| &expr.media)
        .find(|media| accepted.iter().any(|a| a.is_compatible_with(media)))
}
