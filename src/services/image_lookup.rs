// src/services/image_lookup.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header::USER_AGENT};
use scraper::{Html, Selector};

/// Appended to every query so results lean towards food pictures.
const QUERY_QUALIFIER: &str = "recipe";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Something that can turn a short text query into an image URL.
///
/// Implementations absorb their own failures: `None` covers "nothing found" as well as
/// "the lookup broke".
#[async_trait]
pub trait ImageFinder: Send + Sync {
    async fn find_image(&self, query: &str) -> Option<String>;
}

/// Scrapes the first usable `<img>` off a Google image-search results page.
#[derive(Debug, Clone)]
pub struct GoogleImageScraper {
    client: reqwest::Client,
    search_url: String,
}

impl GoogleImageScraper {
    pub fn new(search_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, search_url: search_url.into() })
    }

    async fn fetch_results_page(&self, query: &str) -> reqwest::Result<Option<String>> {
        let response = self
            .client
            .get(&self.search_url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .query(&[("q", query), ("tbm", "isch")])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            tracing::warn!(query, status = %response.status(), "image search refused");
            return Ok(None);
        }
        response.text().await.map(Some)
    }
}

#[async_trait]
impl ImageFinder for GoogleImageScraper {
    async fn find_image(&self, query: &str) -> Option<String> {
        let query = format!("{query} {QUERY_QUALIFIER}");

        let html = match self.fetch_results_page(&query).await {
            Ok(Some(html)) => html,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(%query, error = %err, "image search failed");
                return None;
            }
        };

        let found = first_image_url(&html);
        if found.is_none() {
            tracing::debug!(%query, "no usable image on results page");
        }
        found
    }
}

/// First `<img>` in document order carrying an absolute http(s) URL, looking at the lazy
/// `data-src` attribute before `src`. Inlined `data:` thumbnails are skipped.
pub fn first_image_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("img").ok()?;

    document.select(&selector).find_map(|img| {
        ["data-src", "src"]
            .into_iter()
            .filter_map(|attr| img.value().attr(attr))
            .map(str::trim)
            .find(|url| is_absolute_http(url))
            .map(str::to_string)
    })
}

fn is_absolute_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
