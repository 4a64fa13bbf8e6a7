//! A Redis backed implementation of the [`HostStore`][super::HostStore] trait.
//!
//! Each host is a Redis hash stored under its hostname, with the fields `ip` and `token`. Every
//! write is followed by an `EXPIRE` of the key, so hosts that stop updating are released by
//! Redis itself.
use crate::error::Error;
use crate::host_store::pool::{Manage, Pool, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_IDLE};
use crate::host_store::{Host, HostStore};
use ::redis::aio::{ConnectionLike, MultiplexedConnection};
use ::redis::{AsyncCommands, Client};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const FIELD_IP: &str = "ip";
const FIELD_TOKEN: &str = "token";

/// Opens Redis connections for the [`Pool`], and `PING`s idle ones before reuse.
pub struct RedisManager {
    client: Client,
}

#[async_trait::async_trait]
impl Manage for RedisManager {
    type Connection = MultiplexedConnection;

    async fn connect(&self) -> Result<MultiplexedConnection, Error> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    async fn check(&self, conn: &mut MultiplexedConnection) -> Result<(), Error> {
        let _: String = ::redis::cmd("PING").query_async(conn).await?;
        Ok(())
    }
}

#[allow(clippy::module_name_repetitions)]
pub struct RedisHostStore<M: Manage = RedisManager> {
    pool: Pool<M>,
    expiration_seconds: i64,
}

impl RedisHostStore {
    /// Create a store for the Redis server at `url`. No connection is made until the first
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Redis`] if the URL can't be parsed.
    pub fn new(url: &str, expiration: Duration) -> Result<Self, Error> {
        let client = Client::open(url)?;
        Self::with_manager(RedisManager { client }, expiration)
    }
}

impl<M: Manage> RedisHostStore<M> {
    /// Create a store whose connections come from `manager`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the expiration doesn't fit Redis' `EXPIRE` argument.
    pub fn with_manager(manager: M, expiration: Duration) -> Result<Self, Error> {
        let expiration_seconds = i64::try_from(expiration.as_secs()).map_err(|_| {
            Error::InvalidConfig(format!("expiration of {expiration:?} is too long"))
        })?;
        Ok(RedisHostStore {
            pool: Pool::new(manager, DEFAULT_MAX_IDLE, DEFAULT_IDLE_TIMEOUT),
            expiration_seconds,
        })
    }
}

/// Build a [`Host`] from the fields of its hash. An empty field set is how Redis reports a
/// missing key.
fn host_from_fields(hostname: &str, mut fields: HashMap<String, String>) -> Result<Host, Error> {
    if fields.is_empty() {
        return Err(Error::HostNotFound(hostname.to_string()));
    }
    let ip = fields
        .remove(FIELD_IP)
        .ok_or_else(|| Error::MalformedHost(hostname.to_string(), FIELD_IP))?;
    let token = fields
        .remove(FIELD_TOKEN)
        .ok_or_else(|| Error::MalformedHost(hostname.to_string(), FIELD_TOKEN))?;
    Ok(Host {
        hostname: hostname.to_string(),
        ip,
        token,
    })
}

#[async_trait::async_trait]
impl<M> HostStore for RedisHostStore<M>
where
    M: Manage,
    M::Connection: ConnectionLike + Sync,
{
    async fn get_host(&self, hostname: &str) -> Result<Host, Error> {
        let mut conn = self.pool.get().await?;
        let fields: HashMap<String, String> = conn.hgetall(hostname).await?;
        host_from_fields(hostname, fields)
    }

    async fn set_host(&self, host: &Host) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;
        let fields = [(FIELD_IP, host.ip.as_str()), (FIELD_TOKEN, host.token.as_str())];
        let () = ::redis::cmd("HSET")
            .arg(&host.hostname)
            .arg(&fields[..])
            .query_async(&mut *conn)
            .await?;
        // The hash is written at this point; a failed EXPIRE still fails the update.
        let _: bool = conn
            .expire(&host.hostname, self.expiration_seconds)
            .await?;
        debug!(
            "stored host \"{}\" for {}s",
            host.hostname, self.expiration_seconds
        );
        Ok(())
    }
}
