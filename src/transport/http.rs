//! HTTP transport: `GET http://<address>/cm?cmnd=<command>`.

use std::time::Duration;

use log::debug;
use reqwest::redirect::Policy;
use reqwest::{Client, Request};

use super::{Transport, TransportResponse};
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Reqwest-backed transport shared by every text-protocol device.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);
    const MAX_REDIRECTS: usize = 5;

    /// Build a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(Self::MAX_REDIRECTS))
            .build()
            .map_err(|e| Error::transport("<client>", e))?;
        Ok(HttpTransport { client })
    }

    /// `GET http://<address>/cm?cmnd=<command>`, with the command form-encoded.
    pub(crate) fn command_request(&self, address: &str, command: &str) -> reqwest::Result<Request> {
        self.client
            .get(format!("http://{address}/cm"))
            .query(&[("cmnd", command)])
            .build()
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, address: &str, command: &str) -> Result<TransportResponse> {
        let request = self
            .command_request(address, command)
            .map_err(|e| classify(address, e))?;
        debug!("GET {}", request.url());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| classify(address, e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(address, e))?;

        Ok(TransportResponse { status, body })
    }
}

fn classify(address: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout(address)
    } else if err.is_redirect() {
        Error::transport(address, "too many redirects")
    } else {
        Error::transport(address, err)
    }
}
