//! Route declaration module
//!
//! `RouteSpec` is the declarative, string-based form written in the handler
//! table. `Route` is the compiled form the router evaluates.

use std::fmt;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

use super::matcher::{MediaTypeExpression, NameValueExpression};
use super::pattern::PathPattern;
use super::RouteError;
use crate::binding::RequestContext;
use crate::error::RequestError;

/// Handler signature shared by every endpoint
pub type Handler = fn(&RequestContext) -> Result<Response<Full<Bytes>>, RequestError>;

/// Declarative route: paths, methods, optional conditions and a handler
#[derive(Clone)]
pub struct RouteSpec {
    pub(super) name: &'static str,
    pub(super) paths: Vec<&'static str>,
    pub(super) methods: Vec<Method>,
    pub(super) params: Vec<&'static str>,
    pub(super) headers: Vec<&'static str>,
    pub(super) consumes: Vec<&'static str>,
    pub(super) produces: Vec<&'static str>,
    pub(super) handler: Handler,
}

impl RouteSpec {
    /// Route answering every method
    pub fn request(name: &'static str, path: &'static str, handler: Handler) -> Self {
        Self {
            name,
            paths: vec![path],
            methods: Vec::new(),
            params: Vec::new(),
            headers: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            handler,
        }
    }

    pub fn get(name: &'static str, path: &'static str, handler: Handler) -> Self {
        Self::request(name, path, handler).method(Method::GET)
    }

    pub fn post(name: &'static str, path: &'static str, handler: Handler) -> Self {
        Self::request(name, path, handler).method(Method::POST)
    }

    /// Serve the same handler on another path
    #[must_use]
    pub fn path(mut self, path: &'static str) -> Self {
        self.paths.push(path);
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Require a query/form parameter expression such as `mode=debug`
    #[must_use]
    pub fn params(mut self, expression: &'static str) -> Self {
        self.params.push(expression);
        self
    }

    /// Require a header expression such as `mode=debug`
    #[must_use]
    pub fn headers(mut self, expression: &'static str) -> Self {
        self.headers.push(expression);
        self
    }

    /// Accept only matching request content types
    #[must_use]
    pub fn consumes(mut self, expression: &'static str) -> Self {
        self.consumes.push(expression);
        self
    }

    /// Serve only clients accepting the given media type
    #[must_use]
    pub fn produces(mut self, expression: &'static str) -> Self {
        self.produces.push(expression);
        self
    }
}

/// Compiled route
#[derive(Clone)]
pub struct Route {
    pub name: &'static str,
    pub patterns: Vec<PathPattern>,
    pub methods: Vec<Method>,
    pub params: Vec<NameValueExpression>,
    pub headers: Vec<NameValueExpression>,
    pub consumes: Vec<MediaTypeExpression>,
    pub produces: Vec<MediaTypeExpression>,
    pub handler: Handler,
}

impl Route {
    pub fn compile(spec: &RouteSpec) -> Result<Self, RouteError> {
        if spec.paths.is_empty() {
            return Err(RouteError::NoPath(spec.name));
        }
        Ok(Self {
            name: spec.name,
            patterns: spec
                .paths
                .iter()
                .map(|p| PathPattern::parse(p))
                .collect::<Result<_, _>>()?,
            methods: spec.methods.clone(),
            params: parse_all(&spec.params, NameValueExpression::parse)?,
            headers: parse_all(&spec.headers, NameValueExpression::parse)?,
            consumes: parse_all(&spec.consumes, MediaTypeExpression::parse)?,
            produces: parse_all(&spec.produces, MediaTypeExpression::parse)?,
            handler: spec.handler,
        })
    }

    /// Whether this route serves the method; `HEAD` rides on `GET`
    pub fn allows(&self, method: &Method) -> bool {
        if self.methods.is_empty() {
            return *method != Method::OPTIONS;
        }
        self.methods.contains(method)
            || (*method == Method::HEAD && self.methods.contains(&Method::GET))
    }

    /// Whether the route declares `OPTIONS` itself
    pub fn handles_options(&self) -> bool {
        self.methods.contains(&Method::OPTIONS)
    }
}

fn parse_all<T>(
    raw: &[&'static str],
    parse: impl Fn(&str) -> Result<T, RouteError>,
) -> Result<Vec<T>, RouteError> {
    raw.iter().map(|r| parse(*r)).collect()
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("name", &self.name)
            .field("paths", &self.paths)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("patterns", &self.patterns)
            .field("methods", &self.methods)
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("consumes", &self.consumes)
            .field("produces", &self.produces)
            .finish_non_exhaustive()
    }
}
