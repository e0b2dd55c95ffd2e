//! Reflects the parsed request back as JSON.

use std::sync::Arc;

use serde_json::json;

use crate::parser::HttpRequest;
use crate::server::{Error, Handler, HandlerFuture, HttpResponse, Properties, ServerContext};

/// Replies with the request's URI, method, headers and parameters.
pub struct EchoHandler {
    prefix: String,
    response: HttpResponse,
}

impl EchoHandler {
    /// Create a handler for the routes under `prefix`.
    pub fn new(prefix: String) -> Self {
        Self {
            prefix,
            response: HttpResponse::new(),
        }
    }

    /// Factory for the `echo` kind.
    pub fn build(
        _context: ServerContext,
        prefix: String,
        _config: Arc<Properties>,
    ) -> Result<Box<dyn Handler>, Error> {
        Ok(Box::new(Self::new(prefix)))
    }
}

impl Handler for EchoHandler {
    fn execute<'a>(&'a mut self, request: &'a HttpRequest) -> HandlerFuture<'a> {
        Box::pin(async move {
            let echo = json!({
                "prefix": self.prefix,
                "uri": request.uri,
                "method": request.method.to_string(),
                "headers": request.headers,
                "params": request.params,
            });
            self.response.set_json(&echo)
        })
    }

    fn response(&self) -> &HttpResponse {
        &self.response
    }

    fn into_response(self: Box<Self>) -> HttpResponse {
        self.response
    }
}
