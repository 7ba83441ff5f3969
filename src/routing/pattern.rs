//! Path template module
//!
//! Templates are made of literal segments and whole-segment `{name}`
//! variables, e.g. `/mapping/users/{userId}/orders/{orderId}`.

use super::RouteError;
use crate::binding::PathVariables;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// Compiled path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(source: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: source.to_string(),
            reason: reason.to_string(),
        };

        let rest = source
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for raw in rest.split('/') {
                if raw.is_empty() {
                    return Err(invalid("empty segment"));
                }
                if let Some(name) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
                    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                        return Err(invalid("bad variable name"));
                    }
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Variable(v) if v == name))
                    {
                        return Err(invalid("duplicate variable"));
                    }
                    segments.push(Segment::Variable(name.to_string()));
                } else if raw.contains(['{', '}']) {
                    return Err(invalid("variables must span a whole segment"));
                } else {
                    segments.push(Segment::Literal(raw.to_string()));
                }
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of variables; fewer means more specific
    pub fn variable_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Variable(_)))
            .count()
    }

    /// Match a request path, returning captured (percent-decoded) variables
    pub fn matches(&self, path: &str) -> Option<PathVariables> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut vars = PathVariables::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Variable(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    vars.insert(name.clone(), percent_decode(part));
                }
            }
        }
        Some(vars)
    }
}

/// Decode `%XX` escapes in a path segment; malformed escapes are kept verbatim
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors() {
        assert!(PathPattern::parse("mapping").is_err());
        assert!(PathPattern::parse("/mapping//x").is_err());
        assert!(PathPattern::parse("/mapping/{}").is_err());
        assert!(PathPattern::parse("/mapping/user{id}").is_err());
        assert!(PathPattern::parse("/a/{id}/b/{id}").is_err());
    }

    #[test]
    fn test_match_literal() {
        let pattern = PathPattern::parse("/hello-basic").unwrap();
        assert!(pattern.matches("/hello-basic").is_some());
        assert!(pattern.matches("/hello-basic/").is_none());
        assert!(pattern.matches("/hello").is_none());
        assert_eq!(pattern.variable_count(), 0);
    }

    #[test]
    fn test_match_root() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/x").is_none());
    }

    #[test]
    fn test_match_variables() {
        let pattern = PathPattern::parse("/mapping/users/{userId}/orders/{orderId}").unwrap();
        let vars = pattern.matches("/mapping/users/userA/orders/100").unwrap();
        assert_eq!(vars.get("userId"), Some("userA"));
        assert_eq!(vars.get("orderId"), Some("100"));
        assert_eq!(pattern.variable_count(), 2);

        assert!(pattern.matches("/mapping/users//orders/100").is_none());
        assert!(pattern.matches("/mapping/users/userA/orders").is_none());
    }

    #[test]
    fn test_variables_are_percent_decoded() {
        let pattern = PathPattern::parse("/mapping/{userId}").unwrap();
        let vars = pattern.matches("/mapping/kim%20lee").unwrap();
        assert_eq!(vars.get("userId"), Some("kim lee"));

        let vars = pattern.matches("/mapping/100%").unwrap();
        assert_eq!(vars.get("userId"), Some("100%"));
    }
}
