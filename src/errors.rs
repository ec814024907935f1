//! Error kinds for the grabbing client
//!
//! Every failure is scoped to a single construction or `connect` call and
//! returned to the caller; nothing here is fatal to the process. Retry
//! decisions belong to the orchestration layer driving the client.

use thiserror::Error;

/// Construction-time failures, no client is produced
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The `min_version` token is not in the version table
    #[error("invalid min version specified: {0}")]
    InvalidMinVersion(String),

    /// The `max_version` token is not in the version table
    #[error("invalid max version specified: {0}")]
    InvalidMaxVersion(String),
}

/// Failures raised by the handshake engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Sentinel outcome: certificates were retrieved and the handshake was
    /// intentionally stopped before key exchange. Treated as success by the
    /// connector when running in certs-only mode.
    #[error("certificates retrieved, handshake stopped")]
    CertsOnly,

    /// The TLS layer rejected the handshake
    #[error("tls error: {0}")]
    Tls(#[from] rustls::Error),

    /// I/O failure while running the handshake
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The effective server name is not a valid SNI value
    #[error("invalid server name: {0}")]
    ServerName(String),
}

/// Failures of a single `connect` call
#[derive(Debug, Error)]
pub enum ConnectError {
    /// TCP dial failed
    #[error("could not connect to address: {0}")]
    Connection(#[source] std::io::Error),

    /// The configured deadline elapsed before the handshake completed
    #[error("tls: handshake timed out")]
    Timeout,

    /// The handshake failed for a reason other than certs-only completion
    #[error("could not do tls handshake: {0}")]
    Handshake(#[source] EngineError),
}

impl ConnectError {
    /// True when the failure was the configured deadline elapsing
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// True when retrying against the same target may succeed
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
