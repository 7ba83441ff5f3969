//! HTTP protocol layer module
//!
//! Media type handling and response builders, decoupled from the endpoints.

pub mod media;
pub mod response;

// Re-export commonly used types
pub use media::MediaType;
pub use response::{
    build_error_response, build_json_response, build_options_response, build_text_response,
};
