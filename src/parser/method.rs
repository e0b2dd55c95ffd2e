//! HTTP request methods.

use std::fmt;

/// The request methods an HTTP/1.0 session understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method: Requests a representation of the specified resource.
    GET,
    /// POST method: Submits data; a urlencoded body is merged into the parameters.
    POST,
    /// PUT method: Replaces the target resource. `UPDATE` is accepted as an alias.
    PUT,
    /// DELETE method: Deletes the specified resource.
    DELETE,
    /// HEAD method: Same as GET but the response body is never sent.
    HEAD,
    /// Any other method token, uppercased. Still routed like the rest.
    Other(String),
}

// Method names are matched case-insensitively
impl From<&str> for Method {
    fn from(s: &str) -> Self {
        let upper = s.to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" | "UPDATE" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            _ => Method::Other(upper),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => f.write_str("GET"),
            Method::POST => f.write_str("POST"),
            Method::PUT => f.write_str("PUT"),
            Method::DELETE => f.write_str("DELETE"),
            Method::HEAD => f.write_str("HEAD"),
            Method::Other(name) => f.write_str(name),
        }
    }
}
