use crate::{
    errors::ConfigError,
    options::Options,
    version::{DEFAULT_MAX_VERSION, DEFAULT_MIN_VERSION, TlsVersion},
};
use std::time::Duration;

/// Immutable handshake configuration resolved from [`Options`]
///
/// Built once per client and never mutated afterwards; a `connect` call that
/// needs a different server name works on a per-connection value derived from
/// this one, not on the shared configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Lower protocol bound, defaults to `ssl30`
    pub min_version: TlsVersion,
    /// Upper protocol bound, defaults to `tls12`
    pub max_version: TlsVersion,
    /// Fixed SNI value, inferred per connection when `None`
    pub server_name: Option<String>,
    /// Stop the handshake once certificates have been retrieved
    pub certs_only: bool,
    /// Verify the server certificate chain, disabled by default
    pub verify: bool,
    /// Dial/handshake deadline, `Duration::ZERO` disables it
    pub timeout: Duration,
}

impl ClientConfig {
    /// Resolve caller options into an immutable configuration
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending token when
    /// `min_version` or `max_version` is not in the version table.
    pub fn resolve(options: &Options) -> Result<Self, ConfigError> {
        let min_version = match &options.min_version {
            Some(token) => TlsVersion::from_token(token)
                .ok_or_else(|| ConfigError::InvalidMinVersion(token.clone()))?,
            None => DEFAULT_MIN_VERSION,
        };

        let max_version = match &options.max_version {
            Some(token) => TlsVersion::from_token(token)
                .ok_or_else(|| ConfigError::InvalidMaxVersion(token.clone()))?,
            None => DEFAULT_MAX_VERSION,
        };

        // min > max is not rejected here; the engine reports it as a
        // handshake failure, matching the pass-through of the wire bounds
        let server_name = options
            .server_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self {
            min_version,
            max_version,
            server_name,
            certs_only: options.certs_only,
            verify: options.verify_server_certificate,
            timeout: Duration::from_secs(options.timeout),
        })
    }

    /// The SNI value for a connection dialed at `host`
    ///
    /// The fixed name from the options wins; otherwise the dialed host is
    /// used. The base configuration is never mutated.
    #[must_use]
    pub fn effective_server_name(&self, host: &str) -> String {
        self.server_name
            .clone()
            .unwrap_or_else(|| host.to_string())
    }
}
