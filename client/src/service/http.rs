//! HTTP query service
//!
//! Implements the QueryService trait against the article service's JSON
//! endpoints: `GET /prototypical.json` and `GET /query.json?search=...`.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::QueryService;
use crate::config::ServiceConfig;
use crate::types::ResultSet;

/// Query service talking to a remote article service over HTTP
pub struct HttpQueryService {
    client: Client,
    base_url: String,
}

impl HttpQueryService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url)
            .with_context(|| format!("invalid service URL: {}", config.url))?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<ResultSet> {
        let response = request.send().await.context("query request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("query service error {}: {}", status, text));
        }

        let results: ResultSet = response
            .json()
            .await
            .context("malformed result envelope")?;

        Ok(results)
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_prototypical(&self) -> Result<ResultSet> {
        let url = format!("{}/prototypical.json", self.base_url);
        tracing::debug!(url = %url, "fetching prototypical records");

        self.execute(self.client.get(&url)).await
    }

    async fn fetch_search(&self, query: &str) -> Result<ResultSet> {
        let url = format!("{}/query.json", self.base_url);
        tracing::debug!(url = %url, query = query, "fetching search records");

        self.execute(self.client.get(&url).query(&[("search", query)]))
            .await
    }
}
