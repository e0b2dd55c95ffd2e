//! HTTP request reading and representation.

use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::parser::decode::{decode_params, decode_percent};
use crate::parser::error::Error;
use crate::parser::method::Method;

/// Size of the chunks a POST body is read in.
const BODY_CHUNK_SIZE: usize = 512;

/// Represents a parsed HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The percent-decoded request path, without the query string
    pub uri: String,
    /// The protocol token of the request line, if the client sent one
    pub version: Option<String>,
    /// The HTTP headers, keyed by lowercase name
    pub headers: HashMap<String, String>,
    /// Parameters decoded from the query string and, for POST, the body
    pub params: HashMap<String, String>,
    /// The raw request body (POST only)
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a new HTTP request without a body.
    pub fn new(
        method: Method,
        uri: impl Into<String>,
        headers: HashMap<String, String>,
        params: HashMap<String, String>,
    ) -> Self {
        Self {
            method,
            uri: uri.into(),
            version: None,
            headers,
            params,
            body: Vec::new(),
        }
    }

    /// Get a header value (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_ascii_lowercase())
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// Get a query or form parameter value.
    pub fn get_param(&self, name: &str) -> Option<&String> {
        self.params.get(name)
    }

    /// Check if a parameter exists.
    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }
}

/// Read one HTTP/1.0 request from a buffered stream.
///
/// Returns `Ok(None)` when the stream ends before a request line arrives.
///
/// # Arguments
///
/// * `reader` - The buffered read half of an accepted connection
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request is malformed or the
/// stream fails
pub async fn read_request<R>(reader: &mut R) -> Result<Option<HttpRequest>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = match read_line(reader).await? {
        Some(line) => line,
        None => return Ok(None),
    };

    // Split the request line into method, target and optional version
    let mut tokens = request_line.split_whitespace();
    let method = tokens.next().ok_or(Error::SyntaxError)?;
    let target = tokens.next().ok_or(Error::MissingUri)?;
    let version = tokens.next().map(str::to_string);
    let method = Method::from(method);

    // Decode parameters from the target
    let mut params = HashMap::new();
    let uri = match target.split_once('?') {
        Some((path, query)) => {
            decode_params(query, &mut params)?;
            decode_percent(path)?
        }
        None => decode_percent(target)?,
    };

    // Headers only follow a request line that carries a protocol version
    let mut headers = HashMap::new();
    if version.is_some() {
        while let Some(line) = read_line(reader).await? {
            let line = line.trim();
            if line.is_empty() {
                break;
            }

            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| Error::InvalidHeaderFormat(line.to_string()))?;
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let mut body = Vec::new();
    if method == Method::POST {
        // A missing or malformed Content-Length means "read until the terminator"
        let limit = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok());
        body = read_body(reader, limit).await?;

        let text = std::str::from_utf8(&body).map_err(|_| Error::InvalidEncoding)?;
        decode_params(text.trim(), &mut params)?;
    }

    Ok(Some(HttpRequest {
        method,
        uri,
        version,
        headers,
        params,
        body,
    }))
}

/// Read one line, stripping the line terminator.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }

    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }

    String::from_utf8(buf).map(Some).map_err(|_| Error::InvalidEncoding)
}

/// Read a POST body in fixed-size chunks.
///
/// Stops once `limit` bytes have arrived, the data read so far ends with
/// `\r\n`, or the stream ends.
async fn read_body<R>(reader: &mut R, limit: Option<usize>) -> Result<Vec<u8>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();
    let mut remaining = limit;
    let mut chunk = [0u8; BODY_CHUNK_SIZE];

    while remaining != Some(0) && !body.ends_with(b"\r\n") {
        let want = remaining.map_or(BODY_CHUNK_SIZE, |r| r.min(BODY_CHUNK_SIZE));
        let n = reader.read(&mut chunk[..want]).await?;
        if n == 0 {
            break;
        }

        body.extend_from_slice(&chunk[..n]);
        if let Some(r) = remaining.as_mut() {
            *r -= n;
        }
    }

    Ok(body)
}
