//! Tests for the HTTP request parser.

#[cfg(test)]
mod tests {
    use crate::parser::{read_request, Error, HttpRequest, Method};

    async fn parse(raw: &[u8]) -> Result<Option<HttpRequest>, Error> {
        let mut reader = raw;
        read_request(&mut reader).await
    }

    #[tokio::test]
    async fn test_parse_simple_get_request() {
        let request = b"GET /index.html HTTP/1.0\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await.unwrap().unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.uri, "/index.html");
        assert_eq!(result.version.as_deref(), Some("HTTP/1.0"));
        assert_eq!(result.headers.get("host").unwrap(), "example.com");
        assert!(result.params.is_empty());
        assert!(result.body.is_empty());
    }

    #[tokio::test]
    async fn test_header_keys_are_lowercased_and_trimmed() {
        let request = b"GET / HTTP/1.0\r\nUser-Agent:   test  \r\nX-CUSTOM : a:b\r\n\r\n";
        let result = parse(request).await.unwrap().unwrap();
        assert_eq!(result.headers.get("user-agent").unwrap(), "test");
        assert_eq!(result.headers.get("x-custom").unwrap(), "a:b");
        assert!(result.has_header("USER-AGENT"));
    }

    #[tokio::test]
    async fn test_no_version_means_no_headers() {
        let request = b"GET /plain\r\nHost: ignored\r\n\r\n";
        let result = parse(request).await.unwrap().unwrap();
        assert_eq!(result.version, None);
        assert!(result.headers.is_empty());
    }

    #[tokio::test]
    async fn test_query_parameters_are_decoded() {
        let request = b"GET /Echo?name=Jack%20Daniels&pass=Single+Malt&flag HTTP/1.0\r\n\r\n";
        let result = parse(request).await.unwrap().unwrap();
        assert_eq!(result.uri, "/Echo");
        assert_eq!(result.params.len(), 2);
        assert_eq!(result.get_param("name").unwrap(), "Jack Daniels");
        assert_eq!(result.get_param("pass").unwrap(), "Single Malt");
        assert!(!result.has_param("flag"));
    }

    #[tokio::test]
    async fn test_path_is_percent_decoded() {
        let request = b"GET /my%20files/a+b.txt HTTP/1.0\r\n\r\n";
        let result = parse(request).await.unwrap().unwrap();
        assert_eq!(result.uri, "/my files/a b.txt");
    }

    #[tokio::test]
    async fn test_method_is_case_insensitive() {
        let result = parse(b"head / HTTP/1.0\r\n\r\n").await.unwrap().unwrap();
        assert_eq!(result.method, Method::HEAD);

        let result = parse(b"UPDATE /x HTTP/1.0\r\n\r\n").await.unwrap().unwrap();
        assert_eq!(result.method, Method::PUT);
    }

    #[tokio::test]
    async fn test_post_body_with_content_length() {
        let request = b"POST /form?a=1 HTTP/1.0\r\nContent-Length: 13\r\n\r\nb=2&a=3&c=%21";
        let result = parse(request).await.unwrap().unwrap();
        assert_eq!(result.body, b"b=2&a=3&c=%21");
        assert_eq!(result.get_param("a").unwrap(), "3");
        assert_eq!(result.get_param("b").unwrap(), "2");
        assert_eq!(result.get_param("c").unwrap(), "!");
    }

    #[tokio::test]
    async fn test_post_body_stops_at_declared_length() {
        let request = b"POST /form HTTP/1.0\r\nContent-Length: 3\r\n\r\nx=1&y=2";
        let result = parse(request).await.unwrap().unwrap();
        assert_eq!(result.body, b"x=1");
        assert!(!result.has_param("y"));
    }

    #[tokio::test]
    async fn test_post_body_without_length_reads_to_terminator() {
        let request = b"POST /form HTTP/1.0\r\nContent-Length: nope\r\n\r\nx=1\r\n";
        let result = parse(request).await.unwrap().unwrap();
        assert_eq!(result.get_param("x").unwrap(), "1");
    }

    #[tokio::test]
    async fn test_post_body_reads_until_stream_end() {
        let request = b"POST /form HTTP/1.0\r\n\r\nq=search+term";
        let result = parse(request).await.unwrap().unwrap();
        assert_eq!(result.get_param("q").unwrap(), "search term");
    }

    #[tokio::test]
    async fn test_empty_stream() {
        assert!(parse(b"").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_request_line() {
        assert!(matches!(parse(b"\r\n\r\n").await, Err(Error::SyntaxError)));
    }

    #[tokio::test]
    async fn test_missing_uri() {
        let result = parse(b"GET\r\n\r\n").await;
        assert!(matches!(result, Err(Error::MissingUri)));
    }

    #[tokio::test]
    async fn test_unlisted_method_is_parsed() {
        let result = parse(b"BREW /pot HTTP/1.0\r\n\r\n").await.unwrap().unwrap();
        assert_eq!(result.method, Method::Other("BREW".to_string()));
        assert_eq!(result.uri, "/pot");
    }

    #[tokio::test]
    async fn test_bad_percent_encoding_in_path() {
        let result = parse(b"GET /bad%2 HTTP/1.0\r\n\r\n").await;
        assert!(matches!(result, Err(Error::BadPercentEncoding)));
    }

    #[tokio::test]
    async fn test_bad_percent_encoding_in_query() {
        let result = parse(b"GET /ok?k=%ZZ HTTP/1.0\r\n\r\n").await;
        assert!(matches!(result, Err(Error::BadPercentEncoding)));
    }

    #[tokio::test]
    async fn test_invalid_header_format() {
        let result = parse(b"GET / HTTP/1.0\r\nInvalidHeader\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidHeaderFormat(ref h)) if h == "InvalidHeader"));
    }

    #[tokio::test]
    async fn test_headers_end_at_stream_end() {
        let result = parse(b"GET / HTTP/1.0\r\nHost: a").await.unwrap().unwrap();
        assert_eq!(result.get_header("host").unwrap(), "a");
    }

    #[test]
    fn test_malformed_classification() {
        assert!(Error::MissingUri.is_malformed_request());
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert!(!Error::from(io).is_malformed_request());
    }
}
