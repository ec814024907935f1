use rustls::{
    DigitallySignedStruct, Error as TlsError, RootCertStore, SignatureScheme,
    client::{
        WebPkiServerVerifier,
        danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier},
    },
    pki_types::{CertificateDer, ServerName, UnixTime},
};
use std::{
    fmt,
    sync::{Arc, Mutex},
};

/// Message carried by the handshake abort raised in certs-only mode
pub(crate) const CERTS_ONLY_ABORT: &str = "certificates retrieved, handshake stopped";

/// Raw certificates as presented by the server during the handshake
#[derive(Debug, Clone, Default)]
pub struct CapturedChain {
    /// End-entity certificate, raw DER
    pub leaf: Vec<u8>,
    /// Remaining certificates in transmission order, raw DER
    pub intermediates: Vec<Vec<u8>>,
}

/// Certificate verifier that records the raw presented chain
///
/// Three behaviors, selected at construction:
///
/// - verification off: capture, then accept any certificate
/// - verification on: capture, then delegate to the standard `WebPKI`
///   verifier so all security checks still apply
/// - certs-only: capture, then abort the handshake with a recognizable
///   error so key exchange never runs
#[derive(Clone)]
pub struct CapturingVerifier {
    captured: Arc<Mutex<Option<CapturedChain>>>,
    inner: Option<Arc<WebPkiServerVerifier>>,
    certs_only: bool,
}

impl fmt::Debug for CapturingVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturingVerifier")
            .field("captured", &self.captured)
            .field("verifying", &self.inner.is_some())
            .field("certs_only", &self.certs_only)
            .finish()
    }
}

impl CapturingVerifier {
    /// Create a verifier that accepts any certificate after capturing it
    #[must_use]
    pub fn insecure(certs_only: bool) -> Self {
        Self {
            captured: Arc::new(Mutex::new(None)),
            inner: None,
            certs_only,
        }
    }

    /// Create a verifier that delegates to `WebPKI` over the bundled roots
    ///
    /// # Errors
    ///
    /// Returns the rustls builder error when the `WebPKI` verifier cannot be
    /// constructed.
    pub fn verifying(certs_only: bool) -> Result<Self, TlsError> {
        let root_store: RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
        let inner = WebPkiServerVerifier::builder(Arc::new(root_store))
            .build()
            .map_err(|e| TlsError::General(format!("failed to build WebPKI verifier: {e}")))?;

        Ok(Self {
            captured: Arc::new(Mutex::new(None)),
            inner: Some(inner),
            certs_only,
        })
    }

    /// The chain captured during the handshake, if any
    #[must_use]
    pub fn captured(&self) -> Option<CapturedChain> {
        self.captured.lock().ok()?.clone()
    }
}

impl ServerCertVerifier for CapturingVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        if let Ok(mut captured) = self.captured.lock() {
            *captured = Some(CapturedChain {
                leaf: end_entity.as_ref().to_vec(),
                intermediates: intermediates
                    .iter()
                    .map(|cert| cert.as_ref().to_vec())
                    .collect(),
            });
        }

        if self.certs_only {
            return Err(TlsError::General(CERTS_ONLY_ABORT.to_string()));
        }

        match &self.inner {
            Some(inner) => {
                inner.verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
            }
            None => Ok(ServerCertVerified::assertion()),
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        match &self.inner {
            Some(inner) => inner.verify_tls12_signature(message, cert, dss),
            None => Ok(HandshakeSignatureValid::assertion()),
        }
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        match &self.inner {
            Some(inner) => inner.verify_tls13_signature(message, cert, dss),
            None => Ok(HandshakeSignatureValid::assertion()),
        }
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.as_ref().map_or_else(
            || {
                vec![
                    SignatureScheme::RSA_PKCS1_SHA256,
                    SignatureScheme::RSA_PKCS1_SHA384,
                    SignatureScheme::RSA_PKCS1_SHA512,
                    SignatureScheme::ECDSA_NISTP256_SHA256,
                    SignatureScheme::ECDSA_NISTP384_SHA384,
                    SignatureScheme::ECDSA_NISTP521_SHA512,
                    SignatureScheme::RSA_PSS_SHA256,
                    SignatureScheme::RSA_PSS_SHA384,
                    SignatureScheme::RSA_PSS_SHA512,
                    SignatureScheme::ED25519,
                ]
            },
            |inner| inner.supported_verify_schemes(),
        )
    }
}
