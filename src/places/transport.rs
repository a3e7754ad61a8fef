//! Blocking HTTP transport and pacing capabilities.
//!
//! Both are traits so the driver can run against canned responses and a
//! recording pacer in tests without touching the network or the clock.
use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Status and raw body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// A single blocking GET.
///
/// `Err` means the exchange itself failed (DNS, connect, TLS, timeout, read).
/// Every HTTP status, including 4xx and 5xx, comes back as `Ok`.
pub trait Transport {
    fn fetch(&self, url: &Url) -> Result<HttpResponse>;
}

/// `ureq`-backed transport used by the CLI.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &Url) -> Result<HttpResponse> {
        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .with_context(|| format!("GET {}", url.path()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .with_context(|| format!("read body of {}", url.path()))?;
        Ok(HttpResponse { status, body })
    }
}

/// Delay imposed between records.
pub trait Pacer {
    fn pause(&self, delay: Duration);
}

/// Sleeps the current thread.
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
