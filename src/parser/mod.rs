//! HTTP request parser module.
//!
//! This module turns the bytes of one accepted connection into a structured
//! [`HttpRequest`]: method, decoded path, headers and merged parameters.

mod request;
mod method;
mod decode;
mod error;
mod tests;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use error::Error;
pub use decode::{decode_params, decode_percent};

// Re-export the read_request function
pub use request::read_request;
