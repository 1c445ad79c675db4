//! # HTTP Transport
//!
//! Default [`HttpClient`] implementation backed by `reqwest`. Transport
//! failures are surfaced as typed errors so flows can distinguish a
//! timeout from an unreachable host.

use std::time::Duration;

use anyhow::Result;
use http::StatusCode;

use crate::error::Error;
use crate::provider::HttpClient;
use crate::types::PreparedRequest;

/// An HTTP response reduced to what the engine needs: status and body.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// Response status code.
    pub status: StatusCode,

    /// Response body as text.
    pub body: String,
}

/// `reqwest`-backed transport. Cheap to clone; connections are pooled.
#[derive(Clone, Debug, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a transport with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpClient for ReqwestClient {
    async fn get(
        &self, url: &str, headers: &[(&str, &str)], timeout: Duration,
    ) -> Result<HttpResponse> {
        let mut request = self.client.get(url).timeout(timeout);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| transport_error(url, &e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(url, &e))?;
        Ok(HttpResponse { status, body })
    }

    async fn send(&self, request: &PreparedRequest, timeout: Duration) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(timeout)
            .body(request.body.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| transport_error(&request.url, &e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(&request.url, &e))?;
        Ok(HttpResponse { status, body })
    }
}

fn transport_error(url: &str, err: &reqwest::Error) -> anyhow::Error {
    if err.is_timeout() {
        Error::Timeout(format!("request to {url} timed out")).into()
    } else {
        Error::Network(format!("request to {url} failed: {err}")).into()
    }
}
