use crate::backend::message::{Answer, Query};
use crate::error::Error;
use crate::host_store::DynHostStore;
use crate::zone::Zone;
use time::OffsetDateTime;
use tracing::debug;
use trust_dns_proto::rr::RecordType;

const HOSTMASTER: &str = "hostmaster.example.com.";

/// Answers individual queries from the zone config and the host store.
pub struct Handler {
    zone: Zone,
    hosts: DynHostStore,
}

impl Handler {
    pub fn new(zone: Zone, hosts: DynHostStore) -> Self {
        Handler { zone, hosts }
    }

    /// Produce the answer for a query, if this backend has one.
    ///
    /// `Ok(None)` means no data: the query type isn't served here, or the name is outside the
    /// zone.
    ///
    /// # Errors
    ///
    /// Returns the host store's error for `A` and `ANY` queries, including
    /// [`Error::HostNotFound`] for unregistered or expired hostnames.
    pub async fn handle_query(&self, query: &Query<'_>) -> Result<Option<Answer>, Error> {
        match query.qtype {
            "SOA" => Ok(Some(self.soa_answer())),
            "NS" => Ok(Some(self.ns_answer())),
            "A" | "ANY" => self.address_answer(query.name).await,
            _ => Ok(None),
        }
    }

    fn soa_answer(&self) -> Answer {
        // Wall clock seconds: increases between polls without keeping state.
        let serial = OffsetDateTime::now_utc().unix_timestamp();
        Answer {
            rtype: RecordType::SOA,
            content: format!(
                "{} {HOSTMASTER} {serial} 1800 3600 7200 5",
                self.zone.soa_fqdn()
            ),
        }
    }

    fn ns_answer(&self) -> Answer {
        Answer {
            rtype: RecordType::NS,
            content: self.zone.soa_fqdn().to_string(),
        }
    }

    async fn address_answer(&self, query_name: &str) -> Result<Option<Answer>, Error> {
        let Some(hostname) = self.zone.hostname(query_name) else {
            debug!("\"{query_name}\" is not in {}", self.zone.domain());
            return Ok(None);
        };

        let host = self.hosts.get_host(&hostname).await?;
        Ok(Some(Answer {
            rtype: host.record_type(),
            content: host.ip,
        }))
    }
}
