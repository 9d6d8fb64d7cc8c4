//! retrykit: re-run fallible calls on a configurable backoff schedule.
//!
//! [`retry`] holds the executor and classification rules, [`network`] a
//! preset for transient network failures. [`config`] and [`logging`] are the
//! file configuration and `tracing` setup used by the `retrykit` binary.

pub mod config;
pub mod logging;
pub mod network;
pub mod retry;
