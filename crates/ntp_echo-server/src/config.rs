// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Defaults and the quiet client set.
//!
//! Requests from a quiet client are answered like any other; only the
//! per-request "handled" log line is suppressed. This keeps health checkers
//! and monitoring hosts from flooding the log.

use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use crate::error::ConfigError;

/// Address the server binary listens on unless told otherwise.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:123";

/// Upper bound on how long either stage blocks before re-checking shutdown.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Environment variable holding the comma-separated quiet client list.
pub const QUIET_CLIENTS_ENV: &str = "IGNORE_CLIENT_IPS";

/// Environment variable overriding the listen address.
pub const LISTEN_ENV: &str = "NTP_ECHO_LISTEN";

/// Peer addresses excluded from per-request logging.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QuietClients(BTreeSet<IpAddr>);

impl QuietClients {
    /// An empty set: every request is logged.
    pub fn new() -> Self {
        QuietClients(BTreeSet::new())
    }

    /// Parse a comma-separated list of IP addresses.
    ///
    /// Surrounding whitespace and empty entries are ignored, so `""`,
    /// `" , "` and `"10.0.0.1,"` are all accepted.
    pub fn parse(list: &str) -> Result<Self, ConfigError> {
        let mut set = BTreeSet::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let ip: IpAddr = entry.parse().map_err(|_| ConfigError::InvalidQuietClient {
                entry: entry.to_string(),
            })?;
            set.insert(ip.to_canonical());
        }
        Ok(QuietClients(set))
    }

    /// Whether requests from `ip` should go unlogged.
    ///
    /// IPv4-mapped IPv6 peers (seen on dual-stack sockets) match their IPv4 form.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.contains(&ip.to_canonical())
    }

    /// Number of addresses in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<IpAddr> for QuietClients {
    fn from_iter<I: IntoIterator<Item = IpAddr>>(iter: I) -> Self {
        QuietClients(iter.into_iter().map(|ip| ip.to_canonical()).collect())
    }
}

impl fmt::Display for QuietClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "None");
        }
        for (i, ip) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ip}")?;
        }
        Ok(())
    }
}
