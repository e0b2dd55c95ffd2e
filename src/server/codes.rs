//! Status lines and MIME types.

use std::fmt;
use std::path::Path;

/// HTTP status codes this server sends, with their standard reason phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    BadRequest = 400,
    Forbidden = 403,
    NotFound = 404,
    InternalServerError = 500,
}

impl StatusCode {
    /// Get the numeric status code.
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Formats the status-line text, e.g. `200 OK`.
impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason_phrase())
    }
}

impl From<StatusCode> for String {
    fn from(status: StatusCode) -> Self {
        status.to_string()
    }
}

/// MIME type of plain-text replies.
pub const MIME_PLAINTEXT: &str = "text/plain";
/// MIME type of HTML pages.
pub const MIME_HTML: &str = "text/html";
/// MIME type for files with an unknown extension.
pub const MIME_DEFAULT_BINARY: &str = "application/octet-stream";
/// MIME type of JSON replies.
pub const MIME_JSON: &str = "application/json";

/// Filename extension to MIME type.
const MIME_TYPES: &[(&str, &str)] = &[
    ("htm", "text/html"),
    ("html", "text/html"),
    ("txt", "text/plain"),
    ("asc", "text/plain"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("gif", "image/gif"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("mp3", "audio/mpeg"),
    ("m3u", "audio/mpeg-url"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    ("ogg", "application/x-ogg"),
    ("zip", "application/octet-stream"),
    ("exe", "application/octet-stream"),
    ("class", "application/octet-stream"),
];

/// Look up the MIME type for a filename extension (case-insensitive).
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    MIME_TYPES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
}

/// Look up the MIME type for a path, falling back to [`MIME_DEFAULT_BINARY`].
pub fn mime_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_for_extension)
        .unwrap_or(MIME_DEFAULT_BINARY)
}
