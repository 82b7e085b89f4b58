use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_USER_AGENT: &str = concat!("rs-skinview/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx other than 204. Every endpoint used here is expected to answer with a body.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.status != 204
    }

    /// 204 is how the profile services say "nobody by that name"; newer deployments answer 404.
    pub fn is_missing(&self) -> bool {
        matches!(self.status, 204 | 404)
    }
}

/// Blocking GET. The only way the resolver and fetcher reach the network.
pub trait HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Client {
                message: e.to_string(),
            })?;
        Ok(Self { http })
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!(url, "fetching");

        let response = self.http.get(url).send().map_err(|e| Error::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| Error::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        debug!(url, status, bytes = body.len(), "response");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
