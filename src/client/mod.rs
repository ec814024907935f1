//! Connection and certificate-extraction pipeline
//!
//! # Module Organization
//!
//! - `config` - immutable handshake configuration resolved from options
//! - `connect` - the grabbing client and its connect lifecycle
//! - `engine` - handshake-engine boundary and the rustls-backed engine
//! - `verifier` - certificate-capturing verifier
//! - `cert` - raw DER to normalized record extraction
//! - `response` - the result shape returned to callers
//!
//! # Example
//!
//! ```rust,ignore
//! use tlsgrab::{client::Client, options::Options};
//!
//! let client = Client::new(&Options {
//!     timeout: 5,
//!     ..Options::default()
//! })?;
//!
//! let response = client.connect("example.com", "443").await?;
//! println!("{}", response.version);
//! ```

pub mod cert;
pub mod config;
pub mod connect;
pub mod engine;
pub mod response;
pub mod verifier;

// Re-export commonly used types
pub use cert::{CertificateEntry, CertificateRecord};
pub use config::ClientConfig;
pub use connect::Client;
pub use engine::{HandshakeEngine, HandshakeLog, RustlsEngine, ensure_crypto_provider};
pub use response::{CONNECTION_LABEL, Response};
pub use verifier::CapturingVerifier;
