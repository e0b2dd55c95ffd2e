//! HTTP response types and serialization.

use std::fmt;
use std::io;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::server::codes::{StatusCode, MIME_HTML, MIME_JSON, MIME_PLAINTEXT};
use crate::server::error::Error;

/// A response body: any byte stream, read once during serialization.
pub type Body = Pin<Box<dyn AsyncRead + Send>>;

/// Format a timestamp the way the `Date` header expects it,
/// e.g. `Thu, 5 Mar 2026 09:04:00 GMT`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %-d %b %Y %H:%M:%S GMT").to_string()
}

/// The state every handler accumulates while executing.
///
/// Status defaults to `"200 OK"`. Headers keep insertion order and are never
/// de-duplicated: adding the same name twice sends two header lines.
pub struct HttpResponse {
    status: String,
    mime_type: Option<String>,
    headers: Vec<(String, String)>,
    body: Option<Body>,
}

impl HttpResponse {
    /// Create an empty `200 OK` response.
    pub fn new() -> Self {
        Self::with_status(StatusCode::Ok)
    }

    /// Create an empty response with the given status line.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            mime_type: None,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A plain-text response, as used for error replies.
    pub fn plain_text(status: impl Into<String>, text: impl Into<String>) -> Self {
        let mut response = Self::with_status(status);
        response.set_mime_type(MIME_PLAINTEXT);
        response.set_body_bytes(text.into().into_bytes());
        response
    }

    /// An HTML page that sends the browser on to `location`.
    pub fn redirect_page(location: &str) -> Self {
        let page = format!(
            "<html><meta http-equiv=\"refresh\" content=\"0; url={location}\">\
             <body><a href=\"{location}\">{location}</a></body></html>"
        );
        let mut response = Self::new();
        response.set_mime_type(MIME_HTML);
        response.set_body_bytes(page.into_bytes());
        response
    }

    /// Replace the status line text, e.g. `404 Not Found`.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Set the `Content-Type` value.
    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = Some(mime_type.into());
    }

    /// Append a header line.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Set a streaming body.
    pub fn set_body(&mut self, body: Body) {
        self.body = Some(body);
    }

    /// Set an in-memory body.
    pub fn set_body_bytes(&mut self, bytes: impl Into<Vec<u8>>) {
        self.body = Some(Box::pin(io::Cursor::new(bytes.into())));
    }

    /// Serialize `value` as the JSON body and set the JSON MIME type.
    pub fn set_json<T: Serialize>(&mut self, value: &T) -> Result<(), Error> {
        let json = serde_json::to_vec(value)?;
        self.set_mime_type(MIME_JSON);
        self.set_body_bytes(json);
        Ok(())
    }

    /// The status line text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The `Content-Type` value, if set.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// The extra header lines, in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Whether a body has been set.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Take the body out of the response, leaving none behind.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }

    /// The status line and header block, terminated by the blank line.
    ///
    /// A `Date` header is synthesized from `now` unless one was added.
    pub fn head_bytes(&self, now: DateTime<Utc>) -> Vec<u8> {
        let mut head = format!("HTTP/1.0 {} \r\n", self.status);

        if let Some(mime) = &self.mime_type {
            head.push_str(&format!("Content-Type: {mime}\r\n"));
        }

        if !self.headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("Date")) {
            head.push_str(&format!("Date: {}\r\n", http_date(now)));
        }

        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }

        head.push_str("\r\n");
        head.into_bytes()
    }

    /// Write the whole response to `out`.
    ///
    /// With `send_body` false (HEAD requests) only the head is written, even
    /// if a body was set.
    pub async fn write_to<W>(mut self, out: &mut W, send_body: bool) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        out.write_all(&self.head_bytes(Utc::now())).await?;

        if send_body {
            if let Some(mut body) = self.take_body() {
                tokio::io::copy(&mut body, out).await?;
            }
        }

        out.flush().await
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("mime_type", &self.mime_type)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
