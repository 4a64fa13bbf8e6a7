//! Error types.

use trust_dns_proto::error::ProtoError;

/// Error enumerates the possible DDNS Crab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned by the [pipe backend][crate::backend] for a request line that doesn't split into
    /// exactly six tab separated fields. The wrapped value is the number of fields found.
    #[error("invalid line: expected 6 fields, found {0}")]
    InvalidLine(usize),

    /// Returned by [`HostStore::get_host`][crate::host_store::HostStore::get_host] when no
    /// record exists for the hostname, either because it was never registered or because it
    /// expired.
    #[error("host \"{0}\" not found")]
    HostNotFound(String),

    /// Returned when a stored host record is missing one of its fields.
    #[error("host \"{0}\" is missing field \"{1}\"")]
    MalformedHost(String, &'static str),

    /// Returned when a Redis command, or a Redis connection attempt, fails.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when [trying to load a `Config`][crate::config::Config::try_from_file] fails
    /// due to invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),

    /// Returned when a [`Config`][crate::config::Config] is missing a required setting or holds
    /// an unusable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Returned when a configured domain can't be parsed as a DNS name.
    #[error("DNS error")]
    DNSError(#[from] ProtoError),

    /// Returned by the [HTTP API][crate::api] for a hostname that isn't a single lower case
    /// DNS label.
    #[error("\"{0}\" is not a valid hostname")]
    InvalidHostname(String),

    /// Returned by the [`/new` API endpoint][crate::api] when the hostname is
    /// already registered.
    #[error("hostname \"{0}\" is not available")]
    HostnameTaken(String),

    /// Returned by the [`/update` API endpoint][crate::api] when the
    /// presented token doesn't match the one stored for the hostname.
    #[error("token is not authorized to update \"{0}\"")]
    AuthForbidden(String),

    /// Returned when the HTTP API can't determine the caller's address.
    #[error("unable to determine client address")]
    UnknownClientAddr,
}

impl Error {
    /// Whether the error means "no such host" rather than a failure to find out.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::HostNotFound(_))
    }
}
