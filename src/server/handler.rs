//! The contract every request handler implements.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::parser::HttpRequest;
use crate::server::context::ServerContext;
use crate::server::error::Error;
use crate::server::response::HttpResponse;

/// Static per-route configuration handed to every handler instance.
pub type Properties = HashMap<String, String>;

/// Type alias for the boxed future a handler's `execute` returns.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>>;

/// Builds a fresh handler for one request from the server context, the
/// matched prefix and the route's configuration.
pub type HandlerFactory = Arc<
    dyn Fn(ServerContext, String, Arc<Properties>) -> Result<Box<dyn Handler>, Error> + Send + Sync,
>;

/// A per-request handler.
///
/// An instance lives for exactly one request: it is constructed by its
/// [`HandlerFactory`], executed once, then consumed into its response.
pub trait Handler: Send {
    /// Process the request, filling in the handler's response.
    fn execute<'a>(&'a mut self, request: &'a HttpRequest) -> HandlerFuture<'a>;

    /// The response accumulated so far.
    fn response(&self) -> &HttpResponse;

    /// Consume the handler, yielding its response for serialization.
    fn into_response(self: Box<Self>) -> HttpResponse;

    /// The status line text of the response.
    fn status(&self) -> &str {
        self.response().status()
    }

    /// The MIME type of the response, if set.
    fn mime_type(&self) -> Option<&str> {
        self.response().mime_type()
    }

    /// The extra header lines of the response.
    fn headers(&self) -> &[(String, String)] {
        self.response().headers()
    }
}

/// Wrap a plain constructor function as a [`HandlerFactory`].
pub fn factory<F>(build: F) -> HandlerFactory
where
    F: Fn(ServerContext, String, Arc<Properties>) -> Result<Box<dyn Handler>, Error>
        + Send
        + Sync
        + 'static,
{
    Arc::new(build)
}
