use crate::client::cert::CertificateEntry;
use serde::Serialize;

/// Label identifying the engine backing this implementation
pub const CONNECTION_LABEL: &str = "rustls";

/// Result of one `connect` call, owned by the caller on return
///
/// Intended to be serialized as-is (e.g. to JSON) by the orchestration
/// layer.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub host: String,
    pub port: String,
    /// Version-table token for the negotiated version, empty when the wire
    /// value is outside the table
    pub version: String,
    /// Always [`CONNECTION_LABEL`]
    pub tls_connection: &'static str,
    /// End-entity certificate presented by the server
    pub leaf: CertificateEntry,
    /// Remaining certificates, in the server's transmission order
    pub chain: Vec<CertificateEntry>,
}
