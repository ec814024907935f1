use crate::{
    client::{
        cert,
        config::ClientConfig,
        engine::{HandshakeEngine, HandshakeLog, RustlsEngine},
        response::{CONNECTION_LABEL, Response},
    },
    errors::{ConfigError, ConnectError, EngineError},
    options::Options,
    version::TlsVersion,
};
use log::debug;
use std::time::Duration;
use tokio::{
    net::TcpStream,
    time::{Instant, timeout_at},
};

/// TLS grabbing client
///
/// Holds an immutable [`ClientConfig`]; a single client is safe for
/// concurrent `connect` calls since nothing shared is mutated during a
/// connection.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    /// Create a new grabbing client from caller options
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a version token is not in the version
    /// table; no client is produced in that case.
    pub fn new(options: &Options) -> Result<Self, ConfigError> {
        Ok(Self {
            config: ClientConfig::resolve(options)?,
        })
    }

    /// The resolved configuration backing this client
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connect to `hostname:port` and grab the TLS identity of the endpoint
    ///
    /// Dials, runs the handshake under the configured deadline and returns
    /// the negotiated version plus the presented certificate chain. The
    /// socket is released on every exit path.
    ///
    /// # Errors
    ///
    /// - [`ConnectError::Connection`] when the TCP dial fails
    /// - [`ConnectError::Timeout`] when the deadline elapses first
    /// - [`ConnectError::Handshake`] when the handshake fails for any reason
    ///   other than a certs-only stop
    pub async fn connect(&self, hostname: &str, port: &str) -> Result<Response, ConnectError> {
        let address = join_host_port(hostname, port);
        let deadline = deadline_for(self.config.timeout);

        debug!("dialing {address}");
        let stream = dial(&address, deadline).await?;

        // per-connection value, the base configuration is never mutated
        let server_name = self.config.effective_server_name(host_portion(&address));
        debug!("starting tls handshake with {address} (sni: {server_name})");

        let engine = RustlsEngine::new(&self.config, &server_name, stream)
            .map_err(ConnectError::Handshake)?;

        complete(engine, deadline, hostname, port).await
    }
}

/// Run the handshake under the deadline and assemble the response
async fn complete<E: HandshakeEngine>(
    engine: E,
    deadline: Option<Instant>,
    hostname: &str,
    port: &str,
) -> Result<Response, ConnectError> {
    let log = run_handshake(engine, deadline).await?;
    debug!(
        "handshake with {hostname}:{port} done, version 0x{:04x}, {} chain certificate(s)",
        log.server_hello_version,
        log.server_certificate_chain.len()
    );
    Ok(assemble(hostname, port, &log))
}

/// Drive the handshake to its outcome, bounded by the deadline
///
/// The engine (and with it the socket) is dropped on return, whichever
/// branch is taken; a deadline that fires drops the in-flight handshake
/// future instead of leaving it running.
async fn run_handshake<E: HandshakeEngine>(
    mut engine: E,
    deadline: Option<Instant>,
) -> Result<HandshakeLog, ConnectError> {
    let outcome = match deadline {
        None => engine.handshake().await,
        Some(at) => match timeout_at(at, engine.handshake()).await {
            Ok(outcome) => outcome,
            Err(_) => return Err(ConnectError::Timeout),
        },
    };

    match outcome {
        // the certs-only stop is a successful outcome, not a failure
        Ok(()) | Err(EngineError::CertsOnly) => Ok(engine.handshake_log().unwrap_or_default()),
        Err(err) => Err(ConnectError::Handshake(err)),
    }
}

fn assemble(hostname: &str, port: &str, log: &HandshakeLog) -> Response {
    Response {
        host: hostname.to_string(),
        port: port.to_string(),
        version: TlsVersion::token_for_wire(log.server_hello_version).to_string(),
        tls_connection: CONNECTION_LABEL,
        leaf: cert::extract(&log.server_certificate),
        chain: log
            .server_certificate_chain
            .iter()
            .map(|raw| cert::extract(raw))
            .collect(),
    }
}

fn deadline_for(timeout: Duration) -> Option<Instant> {
    if timeout.is_zero() {
        None
    } else {
        Some(Instant::now() + timeout)
    }
}

async fn dial(address: &str, deadline: Option<Instant>) -> Result<TcpStream, ConnectError> {
    match deadline {
        None => TcpStream::connect(address)
            .await
            .map_err(ConnectError::Connection),
        Some(at) => match timeout_at(at, TcpStream::connect(address)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(err)) => Err(ConnectError::Connection(err)),
            Err(_) => Err(ConnectError::Timeout),
        },
    }
}

/// Compose `host:port`, bracketing IPv6 literals
fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Host portion of an address, with the port and IPv6 brackets stripped
fn host_portion(address: &str) -> &str {
    let host = match address.rfind(':') {
        Some(pos) => address.get(..pos).unwrap_or(address),
        None => address,
    };
    host.trim_start_matches('[').trim_end_matches(']')
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::client::cert::CertificateEntry;

    const TEST_CERT: &[u8] =
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/test_cert.der"));

    /// Scripted engine standing in for the TLS layer
    struct StubEngine {
        outcome: Result<(), EngineError>,
        log: Option<HandshakeLog>,
        delay: Option<Duration>,
    }

    impl StubEngine {
        fn ok(log: HandshakeLog) -> Self {
            Self {
                outcome: Ok(()),
                log: Some(log),
                delay: None,
            }
        }

        fn failing(err: EngineError) -> Self {
            Self {
                outcome: Err(err),
                log: None,
                delay: None,
            }
        }
    }

    impl HandshakeEngine for StubEngine {
        async fn handshake(&mut self) -> Result<(), EngineError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            std::mem::replace(&mut self.outcome, Ok(()))
        }

        fn handshake_log(&self) -> Option<HandshakeLog> {
            self.log.clone()
        }
    }

    fn log_with(version: u16, chain: Vec<Vec<u8>>) -> HandshakeLog {
        HandshakeLog {
            server_hello_version: version,
            server_certificate: TEST_CERT.to_vec(),
            server_certificate_chain: chain,
        }
    }

    #[test]
    fn test_join_host_port() {
        assert_eq!(join_host_port("example.com", "443"), "example.com:443");
        assert_eq!(join_host_port("10.0.0.1", "8443"), "10.0.0.1:8443");
        assert_eq!(join_host_port("::1", "443"), "[::1]:443");
    }

    #[test]
    fn test_host_portion() {
        assert_eq!(host_portion("example.com:443"), "example.com");
        assert_eq!(host_portion("example.com"), "example.com");
        assert_eq!(host_portion("[::1]:443"), "::1");
    }

    #[test]
    fn test_deadline_for_zero_is_none() {
        assert!(deadline_for(Duration::ZERO).is_none());
        assert!(deadline_for(Duration::from_secs(1)).is_some());
    }

    #[tokio::test]
    async fn test_complete_without_deadline_is_synchronous() {
        // timeout of 0 awaits the handshake directly, no timer involved
        let engine = StubEngine::ok(log_with(0x0303, Vec::new()));
        let response = complete(engine, None, "example.com", "443").await.unwrap();
        assert_eq!(response.version, "tls12");
        assert_eq!(response.tls_connection, "rustls");
        assert!(response.leaf.is_parsed());
        assert!(response.chain.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_server_hello_version_maps_to_empty() {
        let engine = StubEngine::ok(log_with(0x0304, Vec::new()));
        let response = complete(engine, None, "example.com", "443").await.unwrap();
        assert_eq!(response.version, "");
    }

    #[tokio::test]
    async fn test_certs_only_sentinel_is_success() {
        let engine = StubEngine {
            outcome: Err(EngineError::CertsOnly),
            log: Some(log_with(0, Vec::new())),
            delay: None,
        };
        let response = complete(engine, None, "example.com", "443").await.unwrap();
        // leaf is populated even though the handshake was stopped early
        let record = response.leaf.record().unwrap();
        assert_eq!(record.subject_common_name, "leaf.tlsgrab.test");
        // the negotiated version is unknown in certs-only mode
        assert_eq!(response.version, "");
    }

    #[tokio::test]
    async fn test_handshake_failure_is_reported() {
        let engine = StubEngine::failing(EngineError::Tls(rustls::Error::HandshakeNotComplete));
        let err = complete(engine, None, "example.com", "443")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("could not do tls handshake"));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_deadline_elapses_before_handshake() {
        let engine = StubEngine {
            outcome: Ok(()),
            log: Some(log_with(0x0303, Vec::new())),
            delay: Some(Duration::from_secs(30)),
        };
        let started = std::time::Instant::now();
        let deadline = deadline_for(Duration::from_millis(100));
        let err = complete(engine, deadline, "example.com", "443")
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(err.is_temporary());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_chain_preserves_transmission_order() {
        let chain = vec![TEST_CERT.to_vec(), vec![0xde, 0xad]];
        let engine = StubEngine::ok(log_with(0x0303, chain));
        let response = complete(engine, None, "example.com", "443").await.unwrap();
        assert_eq!(response.chain.len(), 2);
        assert!(response.chain.first().unwrap().is_parsed());
        assert_eq!(response.chain.get(1), Some(&CertificateEntry::Unparseable));
    }

    #[tokio::test]
    async fn test_empty_log_yields_unparseable_leaf() {
        // an engine that succeeded without observing certificates still
        // produces a response instead of failing
        let engine = StubEngine {
            outcome: Ok(()),
            log: None,
            delay: None,
        };
        let response = complete(engine, None, "example.com", "443").await.unwrap();
        assert_eq!(response.leaf, CertificateEntry::Unparseable);
        assert_eq!(response.version, "");
    }

    #[test]
    fn test_client_new_rejects_bogus_min_version() {
        let options = Options {
            min_version: Some("bogus".to_string()),
            ..Options::default()
        };
        let err = Client::new(&options).unwrap_err();
        assert!(
            err.to_string()
                .contains("invalid min version specified: bogus")
        );
    }

    #[test]
    fn test_client_new_accepts_all_table_tokens() {
        for token in ["ssl30", "tls10", "tls11", "tls12"] {
            let options = Options {
                min_version: Some(token.to_string()),
                max_version: Some(token.to_string()),
                ..Options::default()
            };
            assert!(Client::new(&options).is_ok());
        }
    }
}
