//! HTTP HEAD probe.
//!
//! One HEAD request through the curl crate (libcurl). Transport failures come
//! back as [`NetworkError::Curl`], a missing status line as
//! [`ProtocolError::BadStatusLine`], and any status >= 400 as
//! [`NetworkError::Http`], so the result can be fed straight to the network
//! preset's classification.

use std::str;
use std::time::Duration;

use super::error::{NetworkError, ProtocolError};

/// Connect and total timeouts for a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTimeouts {
    pub connect: Duration,
    pub total: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            total: Duration::from_secs(30),
        }
    }
}

/// Status and the headers of interest from the final response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: u32,
    /// First line of the final response, e.g. `HTTP/1.1 200 OK`.
    pub status_line: String,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

/// Performs a HEAD request and returns the final response's metadata.
///
/// Follows redirects. Runs in the current thread.
pub fn probe(url: &str, timeouts: &ProbeTimeouts) -> Result<ProbeResult, NetworkError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.connect_timeout(timeouts.connect)?;
    easy.timeout(timeouts.total)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    let mut result = parse_headers(&headers);
    if status == 0 || !result.status_line.starts_with("HTTP/") {
        return Err(ProtocolError::BadStatusLine(result.status_line).into());
    }
    if status >= 400 {
        return Err(NetworkError::Http {
            status,
            url: url.to_string(),
        });
    }
    result.status = status;
    Ok(result)
}

/// Parse header lines of the last response block (earlier blocks belong to
/// redirects).
fn parse_headers(lines: &[String]) -> ProbeResult {
    let mut result = ProbeResult::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            result = ProbeResult {
                status_line: line.to_string(),
                ..ProbeResult::default()
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    result.content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("content-type") {
                result.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("etag") {
                result.etag = Some(value.trim_matches('"').to_string());
            }
            if name.eq_ignore_ascii_case("last-modified") {
                result.last_modified = Some(value.to_string());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_headers_content_length_and_type() {
        let lines = [
            "HTTP/1.1 200 OK".to_string(),
            "Content-Length: 12345".to_string(),
            "Content-Type: application/octet-stream".to_string(),
        ];
        let r = parse_headers(&lines);
        assert_eq!(r.status_line, "HTTP/1.1 200 OK");
        assert_eq!(r.content_length, Some(12345));
        assert_eq!(r.content_type.as_deref(), Some("application/octet-stream"));
        assert!(r.etag.is_none());
    }

    #[test]
    fn parse_headers_keeps_last_response_only() {
        let lines = [
            "HTTP/1.1 301 Moved Permanently".to_string(),
            "Location: /new".to_string(),
            "Content-Length: 10".to_string(),
            String::new(),
            "HTTP/1.1 200 OK".to_string(),
            "ETag: \"abc-123\"".to_string(),
            "Last-Modified: Wed, 21 Oct 2015 07:28:00 GMT".to_string(),
        ];
        let r = parse_headers(&lines);
        assert_eq!(r.status_line, "HTTP/1.1 200 OK");
        assert_eq!(r.content_length, None);
        assert_eq!(r.etag.as_deref(), Some("abc-123"));
        assert_eq!(
            r.last_modified.as_deref(),
            Some("Wed, 21 Oct 2015 07:28:00 GMT")
        );
    }

    #[test]
    fn parse_headers_without_status_line() {
        let r = parse_headers(&["Content-Length: 1".to_string()]);
        assert!(r.status_line.is_empty());
        assert_eq!(r.content_length, Some(1));
    }
}
