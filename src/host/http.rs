//! HTTP binding backed by reqwest.

use super::{HttpClient, HttpResponse};
use crate::core::UpdaterError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// [`HttpClient`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client. `timeout` of `None` lets requests wait indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("vsix-updater/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(UpdaterError::from).context("Failed to build HTTP client")?;
        Ok(Self {
            client,
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UpdaterError::from)
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(UpdaterError::from)
            .with_context(|| format!("Failed to read response body from {url}"))?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
