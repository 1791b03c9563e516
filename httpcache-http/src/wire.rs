//! Serialized form of a cached response.
//!
//! An entry is HTTP/1.x message text:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! content-type: text/plain\r\n
//! content-length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! The stored body is already de-chunked, so `Transfer-Encoding` is never
//! written and `Content-Length` is rewritten to the stored length whenever
//! the body is not empty. An empty body keeps the origin's `Content-Length`,
//! which is what a `HEAD` response needs.

use bytes::{BufMut, Bytes, BytesMut};
use http::header::{CONTENT_LENGTH, HeaderName, HeaderValue, TRANSFER_ENCODING};
use http::{HeaderMap, Response, StatusCode, Version};

use crate::error::WireError;

const CRLF: &[u8] = b"\r\n";
const HEAD_END: &[u8] = b"\r\n\r\n";

/// Encodes a response as a cached entry.
pub fn encode(status: StatusCode, version: Version, headers: &HeaderMap, body: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(256 + body.len());
    out.put_slice(format!("{:?} {}", version, status.as_u16()).as_bytes());
    if let Some(reason) = status.canonical_reason() {
        out.put_u8(b' ');
        out.put_slice(reason.as_bytes());
    }
    out.put_slice(CRLF);

    for (name, value) in headers {
        if name == TRANSFER_ENCODING || (name == CONTENT_LENGTH && !body.is_empty()) {
            continue;
        }
        out.put_slice(name.as_str().as_bytes());
        out.put_slice(b": ");
        out.put_slice(value.as_bytes());
        out.put_slice(CRLF);
    }
    if !body.is_empty() {
        out.put_slice(CONTENT_LENGTH.as_str().as_bytes());
        out.put_slice(b": ");
        out.put_slice(body.len().to_string().as_bytes());
        out.put_slice(CRLF);
    }
    out.put_slice(CRLF);
    out.put_slice(body);
    out.freeze()
}

/// Decodes a cached entry. The returned body shares memory with `raw`.
pub fn decode(raw: Bytes) -> Result<Response<Bytes>, WireError> {
    let head_end = raw
        .windows(HEAD_END.len())
        .position(|window| window == HEAD_END)
        .ok_or(WireError::Truncated)?;
    let head = &raw[..head_end];
    let mut lines = head
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line));

    let status_line = lines.next().unwrap_or_default();
    let (version, status) = parse_status_line(status_line)?;

    let mut headers = HeaderMap::new();
    for line in lines {
        let (name, value) = parse_header_line(line)?;
        headers.append(name, value);
    }

    let mut response = Response::new(raw.slice(head_end + HEAD_END.len()..));
    *response.status_mut() = status;
    *response.version_mut() = version;
    *response.headers_mut() = headers;
    Ok(response)
}

fn parse_status_line(line: &[u8]) -> Result<(Version, StatusCode), WireError> {
    let malformed = || WireError::StatusLine(String::from_utf8_lossy(line).into_owned());
    let text = std::str::from_utf8(line).map_err(|_| malformed())?;
    let mut parts = text.splitn(3, ' ');
    let version = match parts.next() {
        Some("HTTP/0.9") => Version::HTTP_09,
        Some("HTTP/1.0") => Version::HTTP_10,
        Some("HTTP/1.1") => Version::HTTP_11,
        Some("HTTP/2.0") => Version::HTTP_2,
        Some("HTTP/3.0") => Version::HTTP_3,
        _ => return Err(malformed()),
    };
    let status = parts
        .next()
        .and_then(|code| StatusCode::from_bytes(code.as_bytes()).ok())
        .ok_or_else(malformed)?;
    Ok((version, status))
}

fn parse_header_line(line: &[u8]) -> Result<(HeaderName, HeaderValue), WireError> {
    let malformed = || WireError::Header(String::from_utf8_lossy(line).into_owned());
    let colon = line.iter().position(|&b| b == b':').ok_or_else(malformed)?;
    let name = HeaderName::from_bytes(line[..colon].trim_ascii()).map_err(|_| malformed())?;
    let value =
        HeaderValue::from_bytes(line[colon + 1..].trim_ascii()).map_err(|_| malformed())?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{CONTENT_TYPE, ETAG};

    #[test]
    fn test_encode_layout() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));

        let raw = encode(StatusCode::OK, Version::HTTP_11, &headers, b"hello");
        assert_eq!(
            &raw[..],
            b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: 5\r\n\r\nhello"
        );
    }

    #[test]
    fn test_decode_restores_response() {
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, HeaderValue::from_static("\"v1\""));
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        let body = b"line one\r\n\r\nline two";

        let raw = encode(StatusCode::NOT_FOUND, Version::HTTP_2, &headers, body);
        let response = decode(raw).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.version(), Version::HTTP_2);
        assert_eq!(response.headers()[ETAG], "\"v1\"");
        assert_eq!(response.headers().get_all("set-cookie").iter().count(), 2);
        assert_eq!(response.headers()[CONTENT_LENGTH], "20");
        assert_eq!(&response.body()[..], body);
    }

    #[test]
    fn test_empty_body_keeps_content_length() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1234"));
        let response = decode(encode(StatusCode::OK, Version::HTTP_11, &headers, b"")).unwrap();
        assert_eq!(response.headers()[CONTENT_LENGTH], "1234");
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode(Bytes::from_static(b"HTTP/1.1 200 OK\r\n")),
            Err(WireError::Truncated)
        ));
        assert!(matches!(
            decode(Bytes::from_static(b"SPDY 200 OK\r\n\r\n")),
            Err(WireError::StatusLine(_))
        ));
        assert!(matches!(
            decode(Bytes::from_static(b"HTTP/1.1 abc\r\n\r\n")),
            Err(WireError::StatusLine(_))
        ));
        assert!(matches!(
            decode(Bytes::from_static(b"HTTP/1.1 200 OK\r\nno colon here\r\n\r\n")),
            Err(WireError::Header(_))
        ));
    }
}
