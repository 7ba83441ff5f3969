//! Routing module
//!
//! Provides request dispatch over a static route table:
//! - Path templates with `{var}` segments
//! - Method, parameter and header conditions
//! - Content negotiation on `Content-Type` and `Accept`

mod matcher;
mod pattern;
mod route;
mod router;

use thiserror::Error;

pub use matcher::{MediaTypeExpression, NameValueExpression};
pub use pattern::PathPattern;
pub use route::{Handler, Route, RouteSpec};
pub use router::{Router, RouterOptions};

/// Invalid route table, detected at startup
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid condition expression '{0}'")]
    InvalidExpression(String),

    #[error("invalid media type expression '{0}'")]
    InvalidMediaType(String),

    #[error("route '{0}' declares no path")]
    NoPath(&'static str),
}
