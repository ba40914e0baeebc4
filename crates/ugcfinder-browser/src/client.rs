//! HTTP client for the Browserless `/content` API.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::BrowserError;

/// Fetches fully-rendered HTML through a Browserless instance.
pub struct BrowserlessClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl BrowserlessClient {
    /// # Errors
    ///
    /// Returns [`BrowserError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`BrowserError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, token: Option<&str>, timeout_secs: u64) -> Result<Self, BrowserError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BrowserError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token: token.map(str::to_owned),
        })
    }

    /// Renders `url` in the remote browser and returns the resulting HTML.
    ///
    /// # Errors
    ///
    /// - [`BrowserError::Api`] on a non-2xx status from Browserless.
    /// - [`BrowserError::Http`] on network failure.
    pub async fn content(&self, url: &str) -> Result<String, BrowserError> {
        let endpoint = self.content_url()?;
        let body = serde_json::json!({
            "url": url,
            "gotoOptions": { "waitUntil": "networkidle2" },
        });

        let resp = self.client.post(endpoint).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.text().await?)
    }

    fn content_url(&self) -> Result<Url, BrowserError> {
        let mut endpoint = self
            .base_url
            .join("content")
            .map_err(|e| BrowserError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if let Some(token) = &self.token {
            endpoint.query_pairs_mut().append_pair("token", token);
        }
        Ok(endpoint)
    }
}
