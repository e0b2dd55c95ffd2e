//! The `httpd-lite` binary: registers routes and serves until Ctrl+C.

use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use httpd_lite::handlers::PUBLIC_HTML;
use httpd_lite::server::RouteConfig;
use httpd_lite::{HttpServer, Properties, ServerConfig, ServerError};

#[derive(Debug, Parser)]
#[command(name = "httpd-lite", version, about = "A minimal HTTP/1.0 server")]
struct Args {
    /// JSON configuration file with the address and routes
    #[arg(short, long, env = "HTTPD_CONFIG")]
    config: Option<PathBuf>,

    /// TCP port to listen on (overrides the configuration file)
    #[arg(short, long, env = "HTTPD_PORT")]
    port: Option<u16>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// The routes served when no configuration file is given.
fn stock_routes(config: &mut ServerConfig) {
    let mut files = Properties::new();
    files.insert(PUBLIC_HTML.to_string(), "./html".to_string());

    for (prefix, kind, props) in [
        ("/Echo", "echo", Properties::new()),
        ("/Status", "status", Properties::new()),
        ("/", "file", files),
    ] {
        config.routes.push(RouteConfig {
            prefix: prefix.to_string(),
            kind: kind.to_string(),
            config: props,
        });
    }
    config.default_route = Some("/".to_string());
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level)).init();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_json_file(path)?,
        None => {
            let mut config = ServerConfig::default();
            stock_routes(&mut config);
            config
        }
    };
    if let Some(port) = args.port {
        config.addr.set_port(port);
    }

    let server = HttpServer::new(config);

    tokio::select! {
        result = server.start() => {
            if let Err(e) = &result {
                error!("Server failed: {e}");
            }
            result
        }
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Received Ctrl+C, shutting down"),
                Err(e) => error!("Error setting up Ctrl+C handler: {e}"),
            }
            server.stop();
            Ok(())
        }
    }
}
