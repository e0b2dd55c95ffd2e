//! Percent-decoding of URIs and `application/x-www-form-urlencoded` data.

use std::collections::HashMap;

use crate::parser::error::Error;

/// Decodes the percent encoding scheme.
///
/// `+` becomes a space and `%XX` becomes the byte `0xXX`. The decoded bytes
/// must form valid UTF-8.
///
/// # Examples
///
/// ```
/// use httpd_lite::parser::decode_percent;
///
/// assert_eq!(decode_percent("an+example%20string").unwrap(), "an example string");
/// assert!(decode_percent("truncated%2").is_err());
/// ```
pub fn decode_percent(input: &str) -> Result<String, Error> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' => {
                let escape = bytes.get(i + 1..i + 3).ok_or(Error::BadPercentEncoding)?;
                decoded.push(hex_pair(escape)?);
                i += 3;
            }
            other => {
                decoded.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8(decoded).map_err(|_| Error::BadPercentEncoding)
}

fn hex_pair(pair: &[u8]) -> Result<u8, Error> {
    let high = hex_digit(pair[0])?;
    let low = hex_digit(pair[1])?;
    Ok(high << 4 | low)
}

fn hex_digit(c: u8) -> Result<u8, Error> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(Error::BadPercentEncoding),
    }
}

/// Decodes `&`-joined `key=value` pairs into `params`.
///
/// Keys are trimmed after decoding. A pair without `=` is dropped, and a key
/// seen twice keeps its last value.
pub fn decode_params(input: &str, params: &mut HashMap<String, String>) -> Result<(), Error> {
    for pair in input.split('&').filter(|s| !s.is_empty()) {
        if let Some((key, value)) = pair.split_once('=') {
            params.insert(decode_percent(key)?.trim().to_string(), decode_percent(value)?);
        }
    }
    Ok(())
}
