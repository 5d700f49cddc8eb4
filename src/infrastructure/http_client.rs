// reqwest-backed HTTP source for the public endpoints
use crate::application::http_source::{FetchError, HttpRequest, HttpResponse, HttpSource};
use crate::infrastructure::config::HttpSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReqwestSource {
    client: reqwest::Client,
}

impl ReqwestSource {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        // GitHub rejects requests without a user agent
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSource for ReqwestSource {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut builder = self.client.get(&request.url);
        if request.accept_json {
            builder = builder.header(reqwest::header::ACCEPT, "application/json");
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        tracing::trace!("GET {} -> {} ({} bytes)", request.url, status, body.len());
        Ok(HttpResponse::new(status, body))
    }
}
