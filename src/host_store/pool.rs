//! A small connection pool.
//!
//! Connections are created on demand and returned to the pool when the [`Pooled`] guard is
//! dropped, whatever path the borrower leaves by. At most `max_idle` connections are kept around,
//! idle connections older than `idle_timeout` are closed, and an idle connection is
//! [checked][Manage::check] before it is handed out again.

use crate::error::Error;
use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_MAX_IDLE: usize = 3;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(240);

/// Creates and health checks the connections held by a [`Pool`].
#[async_trait::async_trait]
pub trait Manage: Send + Sync {
    type Connection: Send;

    /// Open a new connection.
    async fn connect(&self) -> Result<Self::Connection, Error>;

    /// Verify an idle connection is still usable.
    async fn check(&self, conn: &mut Self::Connection) -> Result<(), Error>;
}

struct Idle<C> {
    conn: C,
    since: Instant,
}

pub struct Pool<M: Manage> {
    manager: M,
    idle: Mutex<Vec<Idle<M::Connection>>>,
    max_idle: usize,
    idle_timeout: Duration,
}

impl<M: Manage> Pool<M> {
    pub fn new(manager: M, max_idle: usize, idle_timeout: Duration) -> Self {
        Pool {
            manager,
            idle: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
            idle_timeout,
        }
    }

    /// Borrow a connection, reusing a healthy idle one when possible.
    pub async fn get(&self) -> Result<Pooled<'_, M>, Error> {
        while let Some(mut conn) = self.take_idle() {
            match self.manager.check(&mut conn).await {
                Ok(()) => return Ok(Pooled::new(self, conn)),
                Err(err) => debug!("discarding idle connection: {err}"),
            }
        }
        let conn = self.manager.connect().await?;
        Ok(Pooled::new(self, conn))
    }

    /// Number of connections currently idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn take_idle(&self) -> Option<M::Connection> {
        let mut idle = self.idle.lock();
        let now = Instant::now();
        idle.retain(|i| now.duration_since(i.since) < self.idle_timeout);
        idle.pop().map(|i| i.conn)
    }

    fn put(&self, conn: M::Connection) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(Idle {
                conn,
                since: Instant::now(),
            });
        }
    }
}

/// A borrowed connection that returns itself to the pool when dropped.
pub struct Pooled<'a, M: Manage> {
    conn: Option<M::Connection>,
    pool: &'a Pool<M>,
}

impl<'a, M: Manage> Pooled<'a, M> {
    fn new(pool: &'a Pool<M>, conn: M::Connection) -> Self {
        Pooled {
            conn: Some(conn),
            pool,
        }
    }
}

impl<M: Manage> Deref for Pooled<'_, M> {
    type Target = M::Connection;

    fn deref(&self) -> &Self::Target {
        // NB: only taken in drop.
        self.conn.as_ref().expect("pooled connection is present until dropped")
    }
}

impl<M: Manage> DerefMut for Pooled<'_, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_mut().expect("pooled connection is present until dropped")
    }
}

impl<M: Manage> Drop for Pooled<'_, M> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.put(conn);
        }
    }
}
