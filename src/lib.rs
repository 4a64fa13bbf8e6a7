//! DDNS Crab
//!
//! A small dynamic DNS service for one subdomain, answering queries for [PowerDNS] through its
//! [pipe backend] protocol.
//!
//! Hosts register a name below the configured domain through the [HTTP API][api], receive a
//! token, and use it to keep their address current. Addresses live in [Redis] and expire when a
//! host stops updating for the configured number of days.
//!
//! [PowerDNS]: https://www.powerdns.com
//! [pipe backend]: https://doc.powerdns.com/authoritative/backends/pipe.html
//! [Redis]: https://redis.io
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod host_store;
pub mod zone;

pub use api::new as new_http;
pub use backend::PipeBackend;
pub use config::{Config, Shared};
pub use host_store::{Host, HostStore, InMemoryHostStore, RedisHostStore};
pub use zone::Zone;
