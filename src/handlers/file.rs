//! Serves static files from a configured document root.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use tokio::fs::File;

use crate::parser::HttpRequest;
use crate::server::{
    mime_for_path, Error, Handler, HandlerFuture, HttpResponse, Properties, ServerContext,
    StatusCode,
};

/// Configuration key naming the document root.
pub const PUBLIC_HTML: &str = "publichtml";

const INDEX_FILE: &str = "index.html";

/// Maps the part of the URI after the matched prefix onto a file below the
/// document root.
pub struct FileHandler {
    root: PathBuf,
    prefix: String,
    response: HttpResponse,
}

impl FileHandler {
    /// Create a handler serving files below `root` for URIs under `prefix`.
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            response: HttpResponse::new(),
        }
    }

    /// Factory for the `file` kind; reads the root from `publichtml`.
    pub fn build(
        _context: ServerContext,
        prefix: String,
        config: Arc<Properties>,
    ) -> Result<Box<dyn Handler>, Error> {
        let root = config.get(PUBLIC_HTML).map(String::as_str).unwrap_or(".");
        Ok(Box::new(Self::new(root, prefix)))
    }

    /// The path below the root that `uri` names, or `None` if it tries to
    /// climb out of the root.
    fn relative_path<'u>(&self, uri: &'u str) -> Option<&'u str> {
        let relative = uri.strip_prefix(self.prefix.as_str()).unwrap_or(uri);
        if relative.split(['/', '\\']).any(|segment| segment == "..") {
            return None;
        }
        Some(relative.trim_start_matches('/'))
    }

    async fn serve_file(&mut self, path: &Path) -> Result<(), Error> {
        let mut path = path.to_path_buf();
        if tokio::fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
            path.push(INDEX_FILE);
        }

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No file at {}", path.display());
                self.response =
                    HttpResponse::plain_text(StatusCode::NotFound, "Error 404, file not found.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let length = file.metadata().await?.len();
        self.response.set_mime_type(mime_for_path(&path));
        self.response.add_header("Content-Length", length.to_string());
        self.response.set_body(Box::pin(file));
        Ok(())
    }
}

impl Handler for FileHandler {
    fn execute<'a>(&'a mut self, request: &'a HttpRequest) -> HandlerFuture<'a> {
        Box::pin(async move {
            let path = self.relative_path(&request.uri).map(|r| self.root.join(r));
            match path {
                Some(path) => self.serve_file(&path).await,
                None => {
                    self.response = HttpResponse::plain_text(
                        StatusCode::Forbidden,
                        "FORBIDDEN: Won't serve ../ for security reasons.",
                    );
                    Ok(())
                }
            }
        })
    }

    fn response(&self) -> &HttpResponse {
        &self.response
    }

    fn into_response(self: Box<Self>) -> HttpResponse {
        self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::io::AsyncReadExt;

    use crate::parser::Method;

    async fn fetch(root: &Path, prefix: &str, uri: &str) -> (HttpResponse, String) {
        let request = HttpRequest::new(Method::GET, uri, HashMap::new(), HashMap::new());
        let mut handler = Box::new(FileHandler::new(root, prefix));
        handler.execute(&request).await.unwrap();

        let mut response = handler.into_response();
        let mut body = String::new();
        if let Some(mut stream) = response.take_body() {
            stream.read_to_string(&mut body).await.unwrap();
        }
        (response, body)
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs").join("notes.txt"), "plain notes").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_serves_file_below_prefix() {
        let dir = site();
        let (response, body) = fetch(dir.path(), "/abc", "/abc/docs/notes.txt").await;
        assert_eq!(response.status(), "200 OK");
        assert_eq!(response.mime_type(), Some("text/plain"));
        assert!(response.headers().contains(&("Content-Length".to_string(), "11".to_string())));
        assert_eq!(body, "plain notes");
    }

    #[tokio::test]
    async fn test_directory_serves_index() {
        let dir = site();
        let (response, body) = fetch(dir.path(), "/", "/").await;
        assert_eq!(response.mime_type(), Some("text/html"));
        assert_eq!(body, "<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = site();
        let (response, body) = fetch(dir.path(), "/", "/nothing.png").await;
        assert_eq!(response.status(), "404 Not Found");
        assert!(body.contains("not found"));
    }

    #[tokio::test]
    async fn test_parent_segments_are_forbidden() {
        let dir = site();
        let (response, _) = fetch(dir.path(), "/abc", "/abc/../secret").await;
        assert_eq!(response.status(), "403 Forbidden");
    }

    #[test]
    fn test_relative_path() {
        let handler = FileHandler::new(".", "/abc");
        assert_eq!(handler.relative_path("/abc/a/b"), Some("a/b"));
        assert_eq!(handler.relative_path("/abc"), Some(""));
        assert_eq!(handler.relative_path("/abc/a/../../etc"), None);
    }

    #[test]
    fn test_build_defaults_root() {
        let context = ServerContext::new(Arc::new(crate::server::RouteRegistry::new()), 0);
        let handler = FileHandler::build(context, "/".to_string(), Arc::new(Properties::new()));
        assert!(handler.is_ok());
    }
}
