//! One accepted connection: read, route, execute, respond, close.

use log::{debug, error};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::parser::{read_request, HttpRequest, Method};
use crate::server::codes::StatusCode;
use crate::server::context::ServerContext;
use crate::server::error::Error;
use crate::server::response::HttpResponse;

/// Serves exactly one request per connection, HTTP/1.0 style.
pub struct HttpSession;

impl HttpSession {
    /// Handle a single connection.
    ///
    /// Every request gets an answer unless the socket itself fails: malformed
    /// requests get `400`, unroutable ones a redirect to the default prefix
    /// or `500`. The write half is shut down on every exit path that still
    /// has a working socket.
    pub async fn handle_connection<S>(
        socket: &mut S,
        context: &ServerContext,
        read_buffer_size: usize,
    ) -> Result<(), Error>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        // Reading
        let parsed = {
            let mut reader = BufReader::with_capacity(read_buffer_size, &mut *socket);
            read_request(&mut reader).await
        };

        let request = match parsed {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!("Connection closed before a request line arrived");
                return Ok(());
            }
            Err(e) if e.is_malformed_request() => {
                debug!("Malformed request: {e}");
                let response =
                    HttpResponse::plain_text(StatusCode::BadRequest, format!("BAD REQUEST: {e}"));
                // Error replies keep their body whatever the method
                Self::send(socket, response, true).await?;
                return Err(Error::ParseError(e));
            }
            Err(e) => return Err(e.into()),
        };

        // Routing and executing
        let response = match Self::serve(context, &request).await {
            Some(response) => response,
            None => match context.registry().default_prefix().await {
                Some(default) => HttpResponse::redirect_page(&default),
                None => HttpResponse::plain_text(
                    StatusCode::InternalServerError,
                    "SERVER INTERNAL ERROR: no response was produced.",
                ),
            },
        };

        // Responding
        let send_body = request.method != Method::HEAD;
        Self::send(socket, response, send_body).await
    }

    /// Resolve and run the handler for `request`.
    ///
    /// Construction and execution failures are logged and yield no response.
    async fn serve(context: &ServerContext, request: &HttpRequest) -> Option<HttpResponse> {
        let route = context.registry().resolve(&request.uri).await?;
        debug!(
            "Using handler kind '{kind}' for URI '{prefix}'",
            kind = route.kind,
            prefix = route.prefix
        );

        let mut handler = match (route.factory)(context.clone(), route.prefix.clone(), route.config) {
            Ok(handler) => handler,
            Err(e) => {
                error!(
                    "Failed to construct '{kind}' handler for '{prefix}': {e}",
                    kind = route.kind,
                    prefix = route.prefix
                );
                return None;
            }
        };

        if let Err(e) = handler.execute(request).await {
            error!(
                "Handler '{kind}' failed on '{uri}': {e}",
                kind = route.kind,
                uri = request.uri
            );
            return None;
        }

        Some(handler.into_response())
    }

    async fn send<S>(socket: &mut S, response: HttpResponse, send_body: bool) -> Result<(), Error>
    where
        S: AsyncWrite + Unpin,
    {
        response.write_to(socket, send_body).await?;
        socket.shutdown().await?;
        Ok(())
    }
}
