//! Error type for network operations run under the network preset.

use std::io;

use thiserror::Error;

use crate::retry::Categorized;

/// Connection-state and status-line failures at the HTTP protocol layer.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Server answered with something that is not an HTTP status line.
    #[error("bad status line: {0:?}")]
    BadStatusLine(String),
    #[error("not connected")]
    NotConnected,
    #[error("cannot send request")]
    CannotSendRequest,
    #[error("cannot send header")]
    CannotSendHeader,
}

/// Failure of a network call: socket, protocol, HTTP client, or HTTP status.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("socket: {0}")]
    Io(#[from] io::Error),
    #[error("protocol: {0}")]
    Protocol(#[from] ProtocolError),
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response carried an error status.
    #[error("HTTP {status} from {url}")]
    Http { status: u32, url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    Io,
    Protocol,
    Curl,
    Http,
}

impl Categorized for NetworkError {
    type Category = NetworkErrorKind;

    fn category(&self) -> NetworkErrorKind {
        match self {
            NetworkError::Io(_) => NetworkErrorKind::Io,
            NetworkError::Protocol(_) => NetworkErrorKind::Protocol,
            NetworkError::Curl(_) => NetworkErrorKind::Curl,
            NetworkError::Http { .. } => NetworkErrorKind::Http,
        }
    }
}
