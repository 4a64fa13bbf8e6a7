//! [PowerDNS pipe backend][pipe].
//!
//! PowerDNS starts `ddnscrab backend` as a child process and talks to it over stdin/stdout, one
//! tab separated line per request. After a handshake line (answered with `OK`), each `Q` line is
//! answered with at most one `DATA` line followed by `END`:
//!
//! ```text
//! Q	pi.d.example.org	IN	ANY	-1	192.0.2.1
//! DATA	pi.d.example.org	IN	A	10	-1	198.51.100.7
//! END
//! ```
//!
//! A line that can't be read at all is answered with `FAIL`. Lines that don't have exactly six
//! fields, names outside the zone, unknown hosts and unsupported query types only get `END`.
//! With [`Config::verbose`][`crate::config::Config::verbose`] set, each request and each error
//! is also echoed back as a `LOG` line.
//!
//! [pipe]: https://doc.powerdns.com/authoritative/backends/pipe.html
//!
//! # A/AAAA
//!
//! `A` and `ANY` queries for `<hostname><domain>` are answered from the
//! [host store][crate::host_store]. The answer type follows the stored address, not the query:
//! an address containing a `.` is served as `A`, anything else as `AAAA`.
//!
//! E.g. with config:
//! ```json
//! {
//!   "domain": "d.example.org",
//!   "soa_fqdn": "ns.example.org",
//!   ...
//! }
//! ```
//!
//! and `pi` registered with `2001:db8::1`, an `ANY` query for `pi.d.example.org` returns:
//!
//! ```text
//! DATA	pi.d.example.org	IN	AAAA	10	-1	2001:db8::1
//! ```
//!
//! # NS
//!
//! `NS` queries are answered with [`Config::soa_fqdn`][`crate::config::Config::soa_fqdn`].
//!
//! # SOA
//!
//! `SOA` queries are answered with `soa_fqdn`, a fixed hostmaster address and the current Unix
//! time as serial:
//!
//! ```text
//! DATA	d.example.org	IN	SOA	10	-1	ns.example.org. hostmaster.example.com. 1678600000 1800 3600 7200 5
//! ```
//!
//! _Note: the serial follows the wall clock, so it goes backwards if the clock does._

mod handlers;
pub mod message;
pub mod server;

pub use handlers::Handler;
pub use server::PipeBackend;
