//! Classify socket, protocol, curl and HTTP failures into retry kinds.

use std::io;

use super::error::NetworkError;

/// HTTP statuses worth another attempt: 408, 500, 502, 503, 504.
pub const RETRY_HTTP_CODES: [u32; 5] = [408, 500, 502, 503, 504];

/// High-level classification of a network failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Connection-level failure (reset, refused, DNS, etc.).
    Connection,
    /// Broken status line or connection state at the protocol layer.
    Protocol,
    /// Retriable HTTP status.
    HttpStatus(u16),
    /// Anything else; not retried.
    Other,
}

pub fn is_retriable_status(code: u32) -> bool {
    RETRY_HTTP_CODES.contains(&code)
}

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> FailureKind {
    match u16::try_from(code) {
        Ok(status) if is_retriable_status(code) => FailureKind::HttpStatus(status),
        _ => FailureKind::Other,
    }
}

/// Classify a socket-level error.
pub fn classify_io_error(e: &io::Error) -> FailureKind {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => FailureKind::Timeout,
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::NotConnected
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof
        | io::ErrorKind::Interrupted
        | io::ErrorKind::AddrNotAvailable => FailureKind::Connection,
        _ => FailureKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FailureKind::Connection;
    }
    FailureKind::Other
}

/// Classify a network error into a FailureKind.
pub fn classify(e: &NetworkError) -> FailureKind {
    match e {
        NetworkError::Io(io) => classify_io_error(io),
        NetworkError::Protocol(_) => FailureKind::Protocol,
        NetworkError::Curl(ce) => classify_curl_error(ce),
        NetworkError::Http { status, .. } => classify_http_status(*status),
    }
}

/// Default classification rule of the network preset.
pub fn is_network_failure(e: &NetworkError) -> bool {
    classify(e) != FailureKind::Other
}
