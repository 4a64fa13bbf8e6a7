use crate::error::Error;
use serde::Serialize;

const MAX_HOSTNAME_LEN: usize = 63;

/// Hostnames are a single lower case DNS label: `[a-z0-9-]`, not starting or ending with `-`.
pub(super) fn valid_hostname(hostname: &str) -> Result<(), Error> {
    let valid = (1..=MAX_HOSTNAME_LEN).contains(&hostname.len())
        && hostname
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !hostname.starts_with('-')
        && !hostname.ends_with('-');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidHostname(hostname.to_string()))
    }
}

#[derive(Serialize, Debug, Clone, Default, Ord, PartialOrd, Eq, PartialEq)]
pub(super) struct AvailableResult {
    pub available: bool,
}

#[derive(Serialize, Debug, Clone, Default, Ord, PartialOrd, Eq, PartialEq)]
pub(super) struct NewHostResult {
    pub hostname: String,
    pub ip: String,
    pub token: String,
}

#[derive(Serialize, Debug, Clone, Default, Ord, PartialOrd, Eq, PartialEq)]
pub(super) struct UpdateHostResult {
    pub hostname: String,
    pub ip: String,
}
