use crate::{
    client::{
        config::ClientConfig,
        verifier::{CERTS_ONLY_ABORT, CapturingVerifier},
    },
    errors::EngineError,
};
use rustls::{
    ClientConfig as RustlsClientConfig, SupportedProtocolVersion, pki_types::ServerName,
};
use std::{
    net::IpAddr,
    sync::{Arc, OnceLock},
};
use tokio::net::TcpStream;
use tokio_rustls::{TlsConnector, client::TlsStream};

static CRYPTO_PROVIDER_INIT: OnceLock<()> = OnceLock::new();

/// Ensure the rustls crypto provider is installed
///
/// Safe to call multiple times, installation only happens once.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER_INIT.get_or_init(|| {
        if let Err(err) = rustls::crypto::ring::default_provider().install_default() {
            log::warn!("ring crypto provider already installed: {err:?}");
        }
    });
}

/// Outcome of a completed (or certs-only stopped) handshake
#[derive(Debug, Clone, Default)]
pub struct HandshakeLog {
    /// Negotiated version from the `ServerHello`, 0 when unknown
    pub server_hello_version: u16,
    /// End-entity certificate, raw DER
    pub server_certificate: Vec<u8>,
    /// Remaining certificates in transmission order, raw DER
    pub server_certificate_chain: Vec<Vec<u8>>,
}

/// Boundary to the TLS handshake engine
///
/// `handshake` runs the negotiation once; `handshake_log` exposes what the
/// engine observed, which is populated after success and after a certs-only
/// stop.
pub trait HandshakeEngine {
    /// Run the handshake
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CertsOnly`] when the handshake was stopped on
    /// purpose after certificate retrieval, any other variant on failure.
    fn handshake(&mut self) -> impl Future<Output = Result<(), EngineError>> + Send;

    /// What the engine observed, `None` before the server presented anything
    fn handshake_log(&self) -> Option<HandshakeLog>;
}

/// rustls-supported versions admitted by the configured numeric bounds
///
/// rustls cannot offer SSL 3.0 through TLS 1.1, so bounds reaching below
/// TLS 1.2 act as "no expressible floor".
fn protocol_versions(min: u16, max: u16) -> Vec<&'static SupportedProtocolVersion> {
    [&rustls::version::TLS12, &rustls::version::TLS13]
        .into_iter()
        .filter(|candidate| {
            let wire = u16::from(candidate.version);
            min <= wire && wire <= max
        })
        .collect()
}

/// Convert a host into an SNI value, accepting both DNS names and IPs
///
/// # Errors
///
/// Returns [`EngineError::ServerName`] when the host is neither an IP
/// address nor a valid DNS name.
pub fn server_name_from_host(host: &str) -> Result<ServerName<'static>, EngineError> {
    host.parse::<IpAddr>().map_or_else(
        |_| {
            ServerName::try_from(host.to_string())
                .map_err(|_| EngineError::ServerName(host.to_string()))
        },
        |ip| Ok(ServerName::from(ip).to_owned()),
    )
}

/// True when the handshake failed with the certs-only abort raised by the
/// capturing verifier
fn is_certs_only_abort(err: &std::io::Error) -> bool {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
        .is_some_and(|tls| matches!(tls, rustls::Error::General(msg) if msg == CERTS_ONLY_ABORT))
}

/// Handshake engine backed by rustls via `tokio-rustls`
///
/// Owns the TCP stream for the duration of the connection; dropping the
/// engine releases the socket on every exit path.
pub struct RustlsEngine {
    connector: TlsConnector,
    server_name: ServerName<'static>,
    verifier: CapturingVerifier,
    stream: Option<TcpStream>,
    tls: Option<TlsStream<TcpStream>>,
}

impl RustlsEngine {
    /// Build an engine for one connection
    ///
    /// # Errors
    ///
    /// Fails when the configured version bounds admit no rustls-supported
    /// protocol version, when the `WebPKI` verifier cannot be built, or when
    /// the server name is invalid.
    pub fn new(
        config: &ClientConfig,
        server_name: &str,
        stream: TcpStream,
    ) -> Result<Self, EngineError> {
        ensure_crypto_provider();

        let versions = protocol_versions(config.min_version.wire(), config.max_version.wire());
        if versions.is_empty() {
            return Err(EngineError::Tls(rustls::Error::General(
                "no usable protocol versions within configured bounds".to_string(),
            )));
        }

        let verifier = if config.verify {
            CapturingVerifier::verifying(config.certs_only).map_err(EngineError::Tls)?
        } else {
            CapturingVerifier::insecure(config.certs_only)
        };

        let tls_config = RustlsClientConfig::builder_with_protocol_versions(&versions)
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier.clone()))
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(tls_config)),
            server_name: server_name_from_host(server_name)?,
            verifier,
            stream: Some(stream),
            tls: None,
        })
    }
}

impl HandshakeEngine for RustlsEngine {
    async fn handshake(&mut self) -> Result<(), EngineError> {
        let Some(stream) = self.stream.take() else {
            return Err(EngineError::Io(std::io::Error::other(
                "handshake already performed",
            )));
        };

        match self.connector.connect(self.server_name.clone(), stream).await {
            Ok(tls) => {
                self.tls = Some(tls);
                Ok(())
            }
            Err(err) if is_certs_only_abort(&err) => Err(EngineError::CertsOnly),
            Err(err) => match err
                .get_ref()
                .and_then(|inner| inner.downcast_ref::<rustls::Error>())
            {
                Some(tls) => Err(EngineError::Tls(tls.clone())),
                None => Err(EngineError::Io(err)),
            },
        }
    }

    fn handshake_log(&self) -> Option<HandshakeLog> {
        // the verifier has seen the chain even when the handshake was
        // stopped in certs-only mode; the version is only known once the
        // session is established
        let captured = self.verifier.captured()?;
        let server_hello_version = self
            .tls
            .as_ref()
            .and_then(|tls| tls.get_ref().1.protocol_version())
            .map_or(0, u16::from);

        Some(HandshakeLog {
            server_hello_version,
            server_certificate: captured.leaf,
            server_certificate_chain: captured.intermediates,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_crypto_provider_init_idempotent() {
        ensure_crypto_provider();
        ensure_crypto_provider();
    }

    #[test]
    fn test_protocol_versions_default_bounds() {
        // ssl30..=tls12 admits TLS 1.2, the only table version rustls speaks
        let versions = protocol_versions(0x0300, 0x0303);
        assert_eq!(versions.len(), 1);
        assert_eq!(u16::from(versions.first().unwrap().version), 0x0303);
    }

    #[test]
    fn test_protocol_versions_tls12_pinned() {
        let versions = protocol_versions(0x0303, 0x0303);
        assert_eq!(versions.len(), 1);
    }

    #[test]
    fn test_protocol_versions_below_tls12_empty() {
        assert!(protocol_versions(0x0300, 0x0302).is_empty());
    }

    #[test]
    fn test_protocol_versions_inverted_bounds_empty() {
        assert!(protocol_versions(0x0303, 0x0301).is_empty());
    }

    #[test]
    fn test_server_name_from_hostname() {
        assert!(server_name_from_host("example.com").is_ok());
        assert!(server_name_from_host("scan.example.com").is_ok());
    }

    #[test]
    fn test_server_name_from_ip() {
        assert!(server_name_from_host("127.0.0.1").is_ok());
        assert!(server_name_from_host("::1").is_ok());
    }

    #[test]
    fn test_server_name_invalid() {
        let err = server_name_from_host("not a host name").unwrap_err();
        assert!(err.to_string().contains("invalid server name"));
    }

    #[test]
    fn test_is_certs_only_abort() {
        let tls_err = rustls::Error::General(CERTS_ONLY_ABORT.to_string());
        let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, tls_err);
        assert!(is_certs_only_abort(&io_err));

        let other = std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            rustls::Error::HandshakeNotComplete,
        );
        assert!(!is_certs_only_abort(&other));

        let plain = std::io::Error::other("boom");
        assert!(!is_certs_only_abort(&plain));
    }
}
