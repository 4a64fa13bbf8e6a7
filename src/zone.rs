//! The dynamic DNS zone served by the [pipe backend][crate::backend].

/// Immutable description of the served subdomain.
///
/// `domain` always carries a leading `.` and no trailing `.` (e.g. `.d.example.org`), so a
/// hostname is whatever precedes it in a query name. `soa_fqdn` is the authoritative server name
/// used for `SOA` and `NS` answers and always carries a trailing `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    domain: String,
    soa_fqdn: String,
}

impl Zone {
    pub fn new(domain: &str, soa_fqdn: &str) -> Self {
        let domain = domain.trim_end_matches('.').to_ascii_lowercase();
        let domain = if domain.starts_with('.') {
            domain
        } else {
            format!(".{domain}")
        };
        let soa_fqdn = format!("{}.", soa_fqdn.trim_end_matches('.'));
        Zone { domain, soa_fqdn }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn soa_fqdn(&self) -> &str {
        &self.soa_fqdn
    }

    /// Get the host part of a query name: `pi.d.example.org.` -> `pi`.
    ///
    /// Returns `None` when the name isn't inside the zone, or names the zone apex itself.
    pub fn hostname(&self, query_name: &str) -> Option<String> {
        let name = query_name.trim_end_matches('.').to_ascii_lowercase();
        match name.strip_suffix(&self.domain) {
            Some(hostname) if !hostname.is_empty() => Some(hostname.to_string()),
            _ => None,
        }
    }
}
