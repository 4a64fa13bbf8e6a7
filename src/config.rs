use crate::error::Error;
use crate::host_store::redis::RedisHostStore;
use crate::host_store::DynHostStore;
use crate::zone::Zone;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use trust_dns_proto::rr::Name;

pub type Shared = Arc<Config>;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub domain: String,
    #[serde(default)]
    pub soa_fqdn: Option<String>,
    #[serde(default = "default_redis_addr")]
    pub redis_addr: String,
    #[serde(default = "default_expiration_days")]
    pub expiration_days: u64,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_api_bind_addr")]
    pub api_bind_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_api_timeout")]
    pub api_timeout: Duration,
}

fn default_redis_addr() -> String {
    "127.0.0.1:6379".to_string()
}

fn default_expiration_days() -> u64 {
    10
}

fn default_api_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

fn default_api_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn try_from_json(json: &str) -> Result<Self, Error> {
        let conf: Config = serde_json::from_str(json)?;
        conf.validate()?;
        Ok(conf)
    }

    /// The zone served by the pipe backend. Requires `soa_fqdn`.
    pub fn zone(&self) -> Result<Zone, Error> {
        match self.soa_fqdn.as_deref() {
            None | Some("") => Err(Error::InvalidConfig(
                "soa_fqdn is required to run the backend".to_string(),
            )),
            Some(soa_fqdn) => {
                Name::from_ascii(soa_fqdn)?;
                Ok(Zone::new(&self.domain, soa_fqdn))
            }
        }
    }

    /// Lifetime of a host record without updates.
    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_days * SECONDS_PER_DAY)
    }

    /// The Redis connection URL. Bare `host:port` addresses get a `redis://` scheme.
    pub fn redis_url(&self) -> String {
        if self.redis_addr.contains("://") {
            self.redis_addr.clone()
        } else if let Some(port) = self.redis_addr.strip_prefix(':') {
            format!("redis://127.0.0.1:{port}")
        } else {
            format!("redis://{}", self.redis_addr)
        }
    }

    pub fn host_store(&self) -> Result<DynHostStore, Error> {
        let store = RedisHostStore::new(&self.redis_url(), self.expiration())?;
        Ok(Arc::new(store))
    }

    fn validate(&self) -> Result<(), Error> {
        let domain = self.domain.trim_matches('.');
        if domain.is_empty() {
            return Err(Error::InvalidConfig("domain is required".to_string()));
        }
        Name::from_ascii(domain)?;
        if self.expiration_days == 0 {
            return Err(Error::InvalidConfig(
                "expiration_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
