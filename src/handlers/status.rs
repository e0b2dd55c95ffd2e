//! Introspection: port, route table, hit counters and runtime figures as JSON.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::parser::HttpRequest;
use crate::server::{Error, Handler, HandlerFuture, HttpResponse, Properties, ServerContext};

/// Sections selectable with the `q` parameter, in output order.
const SECTIONS: &[&str] = &[
    "properties",
    "uriresponsesnumber",
    "listofresponses",
    "listofresponseshits",
    "memory",
];

/// Reports on the running server.
///
/// `?q=<section>` returns one section; without `q` every section is returned
/// under its own name. An unknown section yields `{}`.
pub struct StatusHandler {
    context: ServerContext,
    response: HttpResponse,
}

impl StatusHandler {
    /// Create a handler reporting on `context`.
    pub fn new(context: ServerContext) -> Self {
        Self {
            context,
            response: HttpResponse::new(),
        }
    }

    /// Factory for the `status` kind.
    pub fn build(
        context: ServerContext,
        _prefix: String,
        _config: Arc<Properties>,
    ) -> Result<Box<dyn Handler>, Error> {
        Ok(Box::new(Self::new(context)))
    }

    async fn section(context: &ServerContext, name: &str) -> Map<String, Value> {
        let registry = context.registry();
        let mut out = Map::new();

        match name {
            "properties" => {
                out.insert("TCP port".to_string(), json!(context.port()));
            }
            "uriresponsesnumber" => {
                out.insert("Size".to_string(), json!(registry.len().await));
            }
            "listofresponses" => {
                for entry in registry.entries().await {
                    out.insert(entry.prefix, json!(entry.kind));
                }
            }
            "listofresponseshits" => {
                for entry in registry.entries().await {
                    out.insert(entry.prefix, json!(entry.hits));
                }
            }
            "memory" => {
                let uptime = context.uptime().as_millis() as u64;
                out.insert("Uptime".to_string(), json!(uptime));
                out.insert("Active sessions".to_string(), json!(context.active_sessions()));
            }
            _ => {}
        }

        out
    }
}

impl Handler for StatusHandler {
    fn execute<'a>(&'a mut self, request: &'a HttpRequest) -> HandlerFuture<'a> {
        Box::pin(async move {
            let report = match request.get_param("q") {
                Some(name) => Self::section(&self.context, name).await,
                None => {
                    let mut all = Map::new();
                    for name in SECTIONS {
                        let section = Self::section(&self.context, name).await;
                        all.insert(name.to_string(), Value::Object(section));
                    }
                    all
                }
            };
            self.response.set_json(&Value::Object(report))
        })
    }

    fn response(&self) -> &HttpResponse {
        &self.response
    }

    fn into_response(self: Box<Self>) -> HttpResponse {
        self.response
    }
}
