//! Network retry preset.
//!
//! Classifies transient network failures (socket timeouts and resets,
//! protocol-level breakage, curl connection errors, retriable HTTP statuses)
//! and supplies default attempt/delay values. All looping and sleeping is
//! done by [`crate::retry`].

mod classify;
mod error;
mod preset;
mod probe;

pub use classify::{
    classify, classify_curl_error, classify_http_status, classify_io_error, is_network_failure,
    is_retriable_status, FailureKind, RETRY_HTTP_CODES,
};
pub use error::{NetworkError, NetworkErrorKind, ProtocolError};
pub use preset::{retry_config, NetworkRetry, DEFAULT_ATTEMPTS, DEFAULT_DELAY};
pub use probe::{probe, ProbeResult, ProbeTimeouts};
