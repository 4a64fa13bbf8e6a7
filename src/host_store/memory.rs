use crate::error::Error;
use crate::host_store::{Host, HostStore};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    ip: String,
    token: String,
    expires_at: Instant,
}

/// A [`HostStore`] held in process memory. Entries expire the same way Redis keys do: the
/// expiry is reset by every write, and an expired entry reads as absent.
#[derive(Debug)]
pub struct InMemoryHostStore {
    hosts: RwLock<HashMap<String, Entry>>,
    expiration: Duration,
}

impl InMemoryHostStore {
    pub fn new(expiration: Duration) -> Self {
        InMemoryHostStore {
            hosts: RwLock::default(),
            expiration,
        }
    }

    /// Remaining lifetime of the host, if it exists.
    pub async fn ttl(&self, hostname: &str) -> Option<Duration> {
        let hosts = self.hosts.read().await;
        hosts
            .get(hostname)
            .map(|e| e.expires_at.saturating_duration_since(Instant::now()))
            .filter(|ttl| !ttl.is_zero())
    }
}

#[async_trait::async_trait]
impl HostStore for InMemoryHostStore {
    async fn get_host(&self, hostname: &str) -> Result<Host, Error> {
        {
            let hosts = self.hosts.read().await;
            match hosts.get(hostname) {
                None => return Err(Error::HostNotFound(hostname.to_string())),
                Some(e) if e.expires_at > Instant::now() => {
                    return Ok(Host {
                        hostname: hostname.to_string(),
                        ip: e.ip.clone(),
                        token: e.token.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        // Expired: drop it so the map doesn't grow with dead hosts, unless it was rewritten
        // in the meantime.
        let mut hosts = self.hosts.write().await;
        if matches!(hosts.get(hostname), Some(e) if e.expires_at <= Instant::now()) {
            hosts.remove(hostname);
        }
        Err(Error::HostNotFound(hostname.to_string()))
    }

    async fn set_host(&self, host: &Host) -> Result<(), Error> {
        let entry = Entry {
            ip: host.ip.clone(),
            token: host.token.clone(),
            expires_at: Instant::now() + self.expiration,
        };
        self.hosts
            .write()
            .await
            .insert(host.hostname.clone(), entry);
        Ok(())
    }
}
