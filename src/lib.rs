//! Single-connection TLS handshake client
//!
//! Opens a TCP connection, performs a TLS handshake with configurable
//! protocol-version bounds and verification policy, and returns a structured
//! summary of the negotiated version and the certificate chain presented by
//! the server. Built for scanning tooling that needs fast, bounded-time TLS
//! fingerprinting; orchestration across many targets, output formatting and
//! chain trust decisions are left to the caller.

pub mod cli;
pub mod client;
pub mod errors;
pub mod options;
pub mod version;

pub use client::{Client, Response};
pub use errors::{ConfigError, ConnectError};
pub use options::Options;
pub use version::TlsVersion;
