//! HTTP transport used by the lookup client
//!
//! The client only needs "GET this URL and give me the body". Keeping that
//! behind a trait lets tests count how response bodies are released without
//! a network.

use std::io::Read;
use std::time::Duration;

/// Issues GET requests and hands back the response body stream.
///
/// The returned reader owns the response; dropping it releases the
/// underlying connection back to the pool.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, ureq::Error>;
}

/// Pooled HTTP transport backed by a [`ureq::Agent`]
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl UreqTransport {
    /// Create a transport whose connect and overall request timeouts are both
    /// `timeout`. `None` disables both.
    ///
    /// Non-2xx statuses are not turned into errors: the body is always handed
    /// back so the caller can decode whatever the API sent.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_connect(timeout)
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    /// Connect and overall request timeout the agent was built with
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, ureq::Error> {
        let response = self.agent.get(url).call()?;
        Ok(Box::new(response.into_body().into_reader()))
    }
}

/// Convert a timeout in whole seconds to the optional duration the agent
/// expects. Zero means no timeout.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    match secs {
        0 => None,
        s => Some(Duration::from_secs(s)),
    }
}
