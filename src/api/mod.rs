//! HTTP API for registering and updating hosts.
//!
//! The address stored for a host is always the caller's: the `X-Real-IP` header when the API
//! runs behind a reverse proxy, otherwise the TCP peer address.
//!
//! # API Endpoints
//!
//! ## `/healthcheck` (GET)
//!
//!   Returns HTTP 200 (OK) and the JSON body `{"ok":"healthy"}` when the service is operational.
//!
//! ## `/available/:hostname` (GET)
//!
//!   Returns HTTP 200 (OK) and `{"available":true}` when `hostname` can be registered, or
//!   `{"available":false}` when it is taken. Hostnames must be a single DNS label of lower case
//!   letters, digits and `-`. Invalid hostnames get HTTP 400 (Bad Request).
//!
//! ## `/new/:hostname` (GET)
//!
//!   Registers `hostname` with the caller's address and a new token:
//!
//!   ```json
//!   { "hostname": "pi", "ip": "198.51.100.7", "token": "5c1f...e0" }
//!   ```
//!
//!   The token is needed for every later update and is not shown again. Taken hostnames get
//!   HTTP 409 (Conflict).
//!
//! ## `/update/:hostname/:token` (GET)
//!
//!   Stores the caller's current address for `hostname` and resets its expiry:
//!
//!   ```json
//!   { "hostname": "pi", "ip": "198.51.100.8" }
//!   ```
//!
//!   Unknown (or expired) hostnames get HTTP 404 (Not Found), a wrong token HTTP 403
//!   (Forbidden).
//!
//! Errors are returned as `{"error": "<message>"}`.

mod api_error;
mod model;
mod routes;
pub mod server;

pub use server::{new, router};
