//! HTTP server implementation: the connection acceptor.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use log::{debug, error, info};

use crate::server::config::ServerConfig;
use crate::server::context::ServerContext;
use crate::server::error::Error;
use crate::server::handler::Properties;
use crate::server::registry::RouteRegistry;
use crate::server::session::HttpSession;

/// An HTTP/1.0 server.
///
/// Each accepted connection gets its own task; the accept loop never waits on
/// a session.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    registry: Arc<RouteRegistry>,
    shutdown: Arc<Notify>,
}

impl HttpServer {
    /// Create a new HTTP server that knows the built-in handler kinds.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_registry(config, Arc::new(RouteRegistry::default()))
    }

    /// Create a new HTTP server around an existing registry.
    pub fn with_registry(config: ServerConfig, registry: Arc<RouteRegistry>) -> Self {
        Self {
            config,
            registry,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// A handle on the server's route registry.
    pub fn registry(&self) -> Arc<RouteRegistry> {
        self.registry.clone()
    }

    /// Route `prefix` to the handler kind named `kind`.
    ///
    /// Should be called before the server starts; unknown kinds are ignored.
    pub async fn register_uri_response(
        &self,
        prefix: impl Into<String>,
        kind: &str,
        config: Properties,
    ) {
        self.registry.register(prefix, kind, config).await;
    }

    /// Set the prefix used when no route matches.
    pub async fn set_default_response(&self, prefix: impl Into<String>) {
        self.registry.set_default(prefix).await;
    }

    /// Ask a running [`serve`](Self::serve) loop to stop accepting.
    ///
    /// Sessions already in flight run to completion.
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }

    /// Register the routes listed in the configuration.
    async fn apply_configured_routes(&self) {
        for route in &self.config.routes {
            self.registry
                .register(route.prefix.clone(), &route.kind, route.config.clone())
                .await;
        }
        if let Some(default) = &self.config.default_route {
            self.registry.set_default(default.clone()).await;
        }
    }

    /// Log the registered routes.
    async fn display_server_info(&self) {
        info!("Registered routes:");
        for entry in self.registry.entries().await {
            info!("  {prefix} -> {kind}", prefix = entry.prefix, kind = entry.kind);
        }
        if let Some(default) = self.registry.default_prefix().await {
            info!("Default route: {default}");
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        debug!("Listener created for TCP port {port}", port = self.config.addr.port());
        Ok(listener)
    }

    /// Spawn a session for a new connection.
    fn handle_new_connection(
        mut socket: TcpStream,
        addr: SocketAddr,
        context: ServerContext,
        read_buffer_size: usize,
    ) {
        tokio::spawn(async move {
            let _guard = context.session_guard();
            debug!(
                "Creating a session for {addr} (active sessions = {active})",
                active = context.active_sessions()
            );

            match HttpSession::handle_connection(&mut socket, &context, read_buffer_size).await {
                Ok(()) | Err(Error::ParseError(_)) => {}
                Err(Error::IoError(e)) => debug!("Connection from {addr} dropped: {e}"),
                Err(e) => error!("Error handling connection from {addr}: {e}"),
            }
        });
    }

    /// Handle connection errors.
    async fn handle_connection_error(e: std::io::Error) {
        error!("Error accepting connection: {e}");

        // Wait a bit before retrying
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    /// Bind the configured address and serve until [`stop`](Self::stop) is called.
    pub async fn start(&self) -> Result<(), Error> {
        let listener = self.setup_listener().await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        self.apply_configured_routes().await;
        self.display_server_info().await;

        let local_addr = listener.local_addr()?;
        let context = ServerContext::new(self.registry.clone(), local_addr.port());
        info!("Server listening on http://{local_addr}");

        loop {
            tokio::select! {
                // Check for shutdown signal
                _ = self.shutdown.notified() => {
                    info!("Shutting down server...");
                    break;
                }

                // Accept new connections
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            Self::handle_new_connection(
                                socket,
                                addr,
                                context.clone(),
                                self.config.read_buffer_size,
                            );
                        }
                        Err(e) => Self::handle_connection_error(e).await,
                    }
                }
            }
        }

        Ok(())
    }
}
