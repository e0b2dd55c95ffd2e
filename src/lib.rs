//! A minimal HTTP/1.0 server with prefix routing.
//!
//! Each accepted connection carries exactly one request. The request is parsed,
//! routed by URI prefix to a handler kind registered beforehand, and the
//! handler's response is written back before the connection closes.
//!
//! # Features
//!
//! - Request parsing with percent-decoding of the path, query and urlencoded POST bodies
//! - Prefix routing truncated at the second `/`, with a default route and per-route hit counters
//! - Handler kinds constructed by name from a registered-constructor table
//! - Built-in `echo`, `status` and `file` handlers
//!
//! # Examples
//!
//! ## Routing
//!
//! ```
//! use httpd_lite::{Properties, RouteRegistry};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = RouteRegistry::default();
//! registry.register("/Echo", "echo", Properties::new()).await;
//! registry.set_default("/Echo").await;
//!
//! let route = registry.resolve("/Echo/anything").await.unwrap();
//! assert_eq!(route.prefix, "/Echo");
//!
//! let fallback = registry.resolve("/elsewhere").await.unwrap();
//! assert_eq!(fallback.prefix, "/Echo");
//! # }
//! ```
//!
//! ## Running a server
//!
//! ```no_run
//! use httpd_lite::{HttpServer, Properties, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), httpd_lite::ServerError> {
//!     let server = HttpServer::new(ServerConfig::default());
//!     server.register_uri_response("/Echo", "echo", Properties::new()).await;
//!     server.register_uri_response("/Status", "status", Properties::new()).await;
//!     server.set_default_response("/Status").await;
//!     server.start().await
//! }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Export the built-in handler kinds
pub mod handlers;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, Method, read_request};
pub use server::{
    Error as ServerError, Handler, HttpResponse, HttpServer, Properties, RouteRegistry,
    ServerConfig, ServerContext, StatusCode,
};
