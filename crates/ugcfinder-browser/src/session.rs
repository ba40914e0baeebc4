//! A single browsing session over one profile page at a time.
//!
//! The session is stateful: [`BrowserSession::navigate`] loads a profile and
//! every later call reads from that page until the next navigation. It is
//! meant to be owned by exactly one caller and driven serially.

use std::time::Duration;

use crate::client::BrowserlessClient;
use crate::error::BrowserError;
use crate::page::{extract_text, extract_video_links};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Origin profile pages live under, e.g. `https://www.tiktok.com`.
    pub profile_base_url: String,
    /// How long one render attempt may take before the page is refreshed.
    pub attempt_timeout: Duration,
    /// Refreshes allowed per page before giving up.
    pub max_refreshes: u32,
}

struct LoadedPage {
    url: String,
    html: String,
}

pub struct BrowserSession {
    client: BrowserlessClient,
    options: SessionOptions,
    page: Option<LoadedPage>,
}

impl BrowserSession {
    #[must_use]
    pub fn new(client: BrowserlessClient, options: SessionOptions) -> Self {
        Self {
            client,
            options,
            page: None,
        }
    }

    #[must_use]
    pub fn profile_url(&self, profile_id: &str) -> String {
        format!(
            "{}/@{}",
            self.options.profile_base_url.trim_end_matches('/'),
            profile_id.trim_start_matches('@')
        )
    }

    /// Loads the profile page for `profile_id`, replacing the current page.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Stalled`] if every render attempt timed out,
    /// or the underlying Browserless error.
    pub async fn navigate(&mut self, profile_id: &str) -> Result<(), BrowserError> {
        let url = self.profile_url(profile_id);
        self.page = None;
        let html = self.render_with_refresh(&url, 0).await?;
        self.page = Some(LoadedPage { url, html });
        Ok(())
    }

    /// Returns up to `max` recent, non-pinned video links of the current page.
    ///
    /// A page that shows no video cards yet is treated as stalled and
    /// refreshed. If it is still empty once the refresh budget is spent the
    /// profile is assumed to have no public videos.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::NoPage`] before the first navigation, or the
    /// render error from a refresh.
    pub async fn discover_recent_video_links(
        &mut self,
        max: usize,
    ) -> Result<Vec<String>, BrowserError> {
        let Some(page) = self.page.as_ref() else {
            return Err(BrowserError::NoPage);
        };
        let url = page.url.clone();
        let mut links = extract_video_links(&page.html, max);
        let mut refreshes = 0u32;

        while links.is_empty() && max > 0 && refreshes < self.options.max_refreshes {
            refreshes += 1;
            tracing::info!(url = %url, refreshes, "no video cards on page, refreshing");
            let html = self.render_with_refresh(&url, refreshes).await?;
            links = extract_video_links(&html, max);
            self.page = Some(LoadedPage {
                url: url.clone(),
                html,
            });
        }

        if links.is_empty() && max > 0 {
            tracing::warn!(url = %url, "profile shows no public videos");
        }
        Ok(links)
    }

    /// Visible text of the current page.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::NoPage`] before the first navigation.
    pub fn extract_page_text(&self) -> Result<String, BrowserError> {
        self.page
            .as_ref()
            .map(|page| extract_text(&page.html))
            .ok_or(BrowserError::NoPage)
    }

    /// Renders `url`, refreshing whenever an attempt exceeds
    /// `attempt_timeout`. `already_used` refreshes count against the budget.
    async fn render_with_refresh(
        &self,
        url: &str,
        already_used: u32,
    ) -> Result<String, BrowserError> {
        let mut refreshes = already_used;
        loop {
            match tokio::time::timeout(self.options.attempt_timeout, self.client.content(url)).await
            {
                Ok(result) => return result,
                Err(_) if refreshes < self.options.max_refreshes => {
                    refreshes += 1;
                    tracing::warn!(
                        url,
                        refreshes,
                        timeout_secs = self.options.attempt_timeout.as_secs(),
                        "page render stalled, refreshing"
                    );
                }
                Err(_) => {
                    return Err(BrowserError::Stalled {
                        url: url.to_owned(),
                        refreshes,
                    });
                }
            }
        }
    }
}
