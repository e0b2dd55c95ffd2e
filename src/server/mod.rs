//! HTTP server implementation.
//!
//! The server accepts connections, reads one request per connection, routes
//! it by URI prefix to a freshly built handler and writes the handler's
//! response back before closing.

mod codes;
mod response;
mod config;
mod context;
mod error;
mod handler;
mod registry;
mod session;
mod http_server;

// Re-export public items
pub use codes::{
    mime_for_extension, mime_for_path, StatusCode, MIME_DEFAULT_BINARY, MIME_HTML, MIME_JSON,
    MIME_PLAINTEXT,
};
pub use response::{http_date, Body, HttpResponse};
pub use config::{RouteConfig, ServerConfig};
pub use context::ServerContext;
pub use error::Error;
pub use handler::{factory, Handler, HandlerFactory, HandlerFuture, Properties};
pub use registry::{routing_key, ResolvedRoute, RouteRegistry, RouteSnapshot};
pub use session::HttpSession;
pub use http_server::HttpServer;
