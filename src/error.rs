//! Error types.

use std::net::SocketAddr;
use std::path::PathBuf;
use trust_dns_server::proto::error::ProtoError;

/// Error enumerates the possible fakedns error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when the configured domain list does not compile into a valid
    /// match pattern. Surfaced at startup, never at query time.
    #[error("invalid domain pattern")]
    InvalidDomainPattern(#[from] regex::Error),

    /// Returned when the configured upstream resolver address is not a valid
    /// `host:port` (or bare host) value.
    #[error("invalid upstream resolver address: \"{0}\"")]
    InvalidUpstream(String),

    /// Returned when the TLS key file contains no usable private key. Both
    /// PKCS#8 and RSA PEM keys are accepted.
    #[error("no private key found in {0}")]
    MissingTlsKey(PathBuf),

    /// Returned when an upstream exchange does not answer within the
    /// transport-level deadline. The resolver treats this as "no answers"
    /// for the question being relayed.
    #[error("upstream exchange with {0} timed out")]
    UpstreamTimeout(SocketAddr),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when [loading a `Config`][crate::config::Config::try_from_file]
    /// fails due to invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),

    /// Returned when the fakedns server encounters a generic DNS protocol error.
    #[error("DNS error")]
    DNSError(#[from] ProtoError),
}
