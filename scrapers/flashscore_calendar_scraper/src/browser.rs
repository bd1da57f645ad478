use anyhow::Result;
use async_trait::async_trait;
use fantoccini::{Client, Locator};
use std::time::Duration;
use tracing::info;

const TIME_ENTRY_SELECTOR: &str = ".event__time";
const LOAD_MORE_SELECTOR: &str = ".event__more";

/// Length of a current-season kickoff token; older seasons render a longer
/// date format, which is how the pagination loop knows to stop.
const TIME_TOKEN_LEN: usize = 12;

/// The slice of the rendered listing page the pipeline interacts with.
///
/// Production pages are WebDriver-backed; tests script this trait directly.
#[async_trait]
pub trait ListingPage {
    async fn entry_times(&mut self) -> Result<Vec<String>>;
    async fn has_load_more(&mut self) -> Result<bool>;
    async fn click_load_more(&mut self) -> Result<()>;
    async fn rendered_html(&mut self) -> Result<String>;
}

/// Clicks "load more" until the control disappears or the last visible time
/// entry stops looking like a same-season token, then returns. Each click is
/// followed by a fixed settle delay so the new rows can render.
pub async fn expand_listing<P: ListingPage + ?Sized>(page: &mut P, settle: Duration) -> Result<()> {
    let entries = page.entry_times().await?;
    let Some(mut last) = entries.last().map(|t| t.trim().to_string()) else {
        return Ok(());
    };

    while page.has_load_more().await? && last.chars().count() == TIME_TOKEN_LEN {
        page.click_load_more().await?;
        info!("Loading more");
        tokio::time::sleep(settle).await;

        let entries = page.entry_times().await?;
        last = entries
            .last()
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
    }

    Ok(())
}

/// WebDriver-backed listing page.
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListingPage for WebDriverPage {
    async fn entry_times(&mut self) -> Result<Vec<String>> {
        let elements = self.client.find_all(Locator::Css(TIME_ENTRY_SELECTOR)).await?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.text().await?);
        }
        Ok(texts)
    }

    async fn has_load_more(&mut self) -> Result<bool> {
        let controls = self.client.find_all(Locator::Css(LOAD_MORE_SELECTOR)).await?;
        Ok(!controls.is_empty())
    }

    async fn click_load_more(&mut self) -> Result<()> {
        self.client
            .find(Locator::Css(LOAD_MORE_SELECTOR))
            .await?
            .click()
            .await?;
        Ok(())
    }

    async fn rendered_html(&mut self) -> Result<String> {
        Ok(self.client.source().await?)
    }
}
