//! Host registry storage.
//!
//! A [`Host`] is the current address of one dynamic DNS registrant, keyed by its hostname (the
//! leftmost label of the queried name). Every write refreshes the record's expiry; a host that
//! isn't updated within the configured number of days disappears, and is afterwards
//! indistinguishable from a hostname that was never registered.
//!
//! Two implementations of [`HostStore`] are provided, [`redis::RedisHostStore`] and
//! [`memory::InMemoryHostStore`]. The former is what the binary uses. The latter keeps its state
//! in process memory and is used as a substitute in tests.

use crate::error::Error;
use ring::digest;
use std::sync::Arc;
use time::OffsetDateTime;
use trust_dns_proto::rr::RecordType;

pub mod memory;
pub mod pool;
pub mod redis;

#[allow(clippy::module_name_repetitions)]
pub use self::memory::InMemoryHostStore;
#[allow(clippy::module_name_repetitions)]
pub use self::redis::RedisHostStore;

/// `DynHostStore` is a type alias for a [`HostStore`] shared between the pipe backend and the
/// HTTP API handlers.
#[allow(clippy::module_name_repetitions)]
pub type DynHostStore = Arc<dyn HostStore>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub hostname: String,
    pub ip: String,
    pub token: String,
}

impl Host {
    /// A new host with a freshly generated token.
    pub fn register(hostname: impl Into<String>, ip: impl Into<String>) -> Self {
        let mut host = Host {
            hostname: hostname.into(),
            ip: ip.into(),
            token: String::new(),
        };
        host.token = host.generate_token();
        host
    }

    /// Hash of the current time in nanoseconds and the hostname, hex encoded.
    ///
    /// Tokens are opaque and practically unique per (time, hostname) pair; nothing about them
    /// depends on the address.
    pub fn generate_token(&self) -> String {
        let mut ctx = digest::Context::new(&digest::SHA256);
        ctx.update(
            OffsetDateTime::now_utc()
                .unix_timestamp_nanos()
                .to_string()
                .as_bytes(),
        );
        ctx.update(self.hostname.as_bytes());
        hex::encode(ctx.finish())
    }

    /// Returns true when this host has an IPv4 address and false if IPv6.
    pub fn is_ipv4(&self) -> bool {
        self.ip.contains('.')
    }

    /// The record type this host's address is served as.
    pub fn record_type(&self) -> RecordType {
        if self.is_ipv4() {
            RecordType::A
        } else {
            RecordType::AAAA
        }
    }
}

/// An async trait describing TTL bounded storage of [`Host`] records, keyed by hostname.
#[async_trait::async_trait]
pub trait HostStore: Send + Sync {
    /// Get the host registered under the given hostname, or [`Error::HostNotFound`].
    async fn get_host(&self, hostname: &str) -> Result<Host, Error>;

    /// Store the host under its hostname and reset its expiry.
    async fn set_host(&self, host: &Host) -> Result<(), Error>;

    /// Whether no host is currently registered under the given hostname.
    async fn available(&self, hostname: &str) -> Result<bool, Error> {
        match self.get_host(hostname).await {
            Ok(_) => Ok(false),
            Err(Error::HostNotFound(_)) => Ok(true),
            Err(err) => Err(err),
        }
    }
}
