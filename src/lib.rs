//! HTTP request/response binding demo server
//!
//! A hyper-based server whose endpoints show the common ways of binding
//! request data (query and form parameters, path variables, headers,
//! cookies, raw and JSON bodies) and of writing responses.

pub mod binding;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod model;
pub mod routing;
pub mod server;
