use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use fantoccini::ClientBuilder;
use std::time::Duration;
use tracing::warn;

use crate::{
    browser::{expand_listing, ListingPage, WebDriverPage},
    match_parser::ListingParser,
    types::MatchRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to start webdriver session at {url}: {source}")]
    Session {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },
    #[error("Failed to open {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },
    #[error("Failed to expand listing at {url}: {source}")]
    Pagination {
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to capture rendered page at {url}: {source}")]
    Render {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Loads one listing URL end to end: fresh browser session, settle, expand
/// pagination, capture the rendered markup, extract match records.
///
/// Each load owns its session and closes it on every path; a failed load
/// never leaks a browser instance into the next team's cycle.
pub struct MatchSourceLoader {
    webdriver_url: String,
    zone: Tz,
    settle: Duration,
}

impl MatchSourceLoader {
    pub fn new(webdriver_url: impl Into<String>, zone: Tz, settle: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            zone,
            settle,
        }
    }

    /// `include_result = true` for results listings (description carries the
    /// score), `false` for fixtures (empty description).
    pub async fn load(&self, url: &str, include_result: bool) -> Result<Vec<MatchRecord>, LoadError> {
        let client = ClientBuilder::native()
            .connect(&self.webdriver_url)
            .await
            .map_err(|source| LoadError::Session {
                url: self.webdriver_url.clone(),
                source,
            })?;

        let result = self.load_in_session(&client, url, include_result).await;

        if let Err(e) = client.close().await {
            warn!("Failed to close webdriver session cleanly: {}", e);
        }

        result
    }

    async fn load_in_session(
        &self,
        client: &fantoccini::Client,
        url: &str,
        include_result: bool,
    ) -> Result<Vec<MatchRecord>, LoadError> {
        client.goto(url).await.map_err(|source| LoadError::Navigation {
            url: url.to_string(),
            source,
        })?;
        tokio::time::sleep(self.settle).await;

        let mut page = WebDriverPage::new(client.clone());
        expand_listing(&mut page, self.settle)
            .await
            .map_err(|source| LoadError::Pagination {
                url: url.to_string(),
                source,
            })?;

        let html = page.rendered_html().await.map_err(|source| LoadError::Render {
            url: url.to_string(),
            source,
        })?;

        let reference_year = Utc::now().with_timezone(&self.zone).year();
        let parser = ListingParser::new(self.zone, reference_year);
        Ok(parser.parse(&html, include_result))
    }
}
