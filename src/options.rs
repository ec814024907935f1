/// Caller-supplied options for building a grabbing [`Client`](crate::client::Client)
///
/// Version tokens are resolved against the version table at construction
/// time; an unrecognized token fails `Client::new` with a
/// [`ConfigError`](crate::errors::ConfigError).
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Dial/handshake deadline in seconds, 0 disables the deadline
    pub timeout: u64,
    /// SNI override, inferred from the dialed host when empty
    pub server_name: Option<String>,
    /// Lower protocol bound token (`ssl30`, `tls10`, `tls11`, `tls12`)
    pub min_version: Option<String>,
    /// Upper protocol bound token
    pub max_version: Option<String>,
    /// Stop the handshake once certificates have been retrieved
    pub certs_only: bool,
    /// Verify the server certificate chain against the `WebPKI` roots
    pub verify_server_certificate: bool,
}
