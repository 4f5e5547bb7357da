use std::net::SocketAddr;
use std::time::Duration;

use crate::fetch::{DEFAULT_FETCH_TIMEOUT, DEFAULT_USER_AGENT};

/// Runtime configuration for the proxy server.
///
/// Defaults reproduce the stock behavior: a 10 second upstream timeout
/// and a 5 minute shared-cache lifetime on successful responses.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the proxy listens on.
    pub bind: SocketAddr,
    /// Hard bound on each upstream fetch.
    pub fetch_timeout: Duration,
    /// `max-age` (seconds) advertised on successful proxy responses.
    pub cache_max_age: u32,
    /// Client identifier sent to upstream feed servers.
    pub user_agent: String,
    /// Permit fetching feeds from localhost/private addresses. Off by
    /// default; the proxy fetches caller-supplied URLs, so private
    /// targets are refused unless explicitly enabled.
    pub allow_private_networks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: ([0, 0, 0, 0], 3000).into(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            cache_max_age: 300,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_private_networks: false,
        }
    }
}
