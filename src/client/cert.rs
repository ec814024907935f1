use serde::Serialize;
use x509_parser::{
    extensions::GeneralName,
    prelude::{FromDer, X509Certificate},
    x509::X509Name,
};

/// Normalized, decoder-independent projection of a certificate's identity
/// fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertificateRecord {
    pub dns_names: Vec<String>,
    pub emails: Vec<String>,
    pub issuer_common_name: String,
    pub issuer_organization: Vec<String>,
    pub subject_common_name: String,
    pub subject_organization: Vec<String>,
}

/// Outcome of decoding one presented certificate
///
/// A malformed certificate is reported as [`Unparseable`] instead of
/// aborting the response, so callers can tell an empty-but-real certificate
/// from a decode failure.
///
/// [`Unparseable`]: CertificateEntry::Unparseable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CertificateEntry {
    Parsed(CertificateRecord),
    Unparseable,
}

impl CertificateEntry {
    /// The decoded record, `None` for unparseable certificates
    #[must_use]
    pub const fn record(&self) -> Option<&CertificateRecord> {
        match self {
            Self::Parsed(record) => Some(record),
            Self::Unparseable => None,
        }
    }

    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

/// Decode raw DER bytes into a normalized record
///
/// Decode failures never propagate, they yield
/// [`CertificateEntry::Unparseable`].
#[must_use]
pub fn extract(raw: &[u8]) -> CertificateEntry {
    match X509Certificate::from_der(raw) {
        Ok((_, cert)) => CertificateEntry::Parsed(record_from(&cert)),
        Err(err) => {
            log::debug!("failed to parse certificate: {err}");
            CertificateEntry::Unparseable
        }
    }
}

fn record_from(cert: &X509Certificate<'_>) -> CertificateRecord {
    let mut dns_names = Vec::new();
    let mut emails = Vec::new();

    if let Ok(Some(san)) = cert.subject_alternative_name() {
        for name in &san.value.general_names {
            match name {
                GeneralName::DNSName(dns) => dns_names.push((*dns).to_string()),
                GeneralName::RFC822Name(email) => emails.push((*email).to_string()),
                _ => {}
            }
        }
    }

    CertificateRecord {
        dns_names,
        emails,
        issuer_common_name: common_name(cert.issuer()),
        issuer_organization: organizations(cert.issuer()),
        subject_common_name: common_name(cert.subject()),
        subject_organization: organizations(cert.subject()),
    }
}

fn common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .find_map(|attr| attr.as_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn organizations(name: &X509Name<'_>) -> Vec<String> {
    name.iter_organization()
        .filter_map(|attr| attr.as_str().ok())
        .map(ToString::to_string)
        .collect()
}
