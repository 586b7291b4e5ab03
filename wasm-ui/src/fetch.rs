//! HTTP loads for the article collection and remote article bodies.

use blog_rs::{BlogError, Result};
use gloo::net::http::Request;
use web_sys::RequestCache;

/// Where the client finds its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiConfig {
    /// Article collection, relative to the page.
    pub articles_url: &'static str,
    /// Bypass the HTTP cache for the collection so rebuilt posts show up.
    pub fresh_articles: bool,
}

pub const UI_CONFIG: UiConfig = UiConfig {
    articles_url: "assets/articles.json",
    fresh_articles: true,
};

async fn get_text(url: &str, fresh: bool) -> std::result::Result<String, String> {
    let mut request = Request::get(url);
    if fresh {
        request = request.cache(RequestCache::NoStore);
    }
    let response = request.send().await.map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!(
            "{url}: HTTP {} {}",
            response.status(),
            response.status_text()
        ));
    }
    response.text().await.map_err(|e| e.to_string())
}

/// Fetch the collection body. Parsing happens in the article cache.
pub async fn fetch_articles(config: UiConfig) -> Result<String> {
    get_text(config.articles_url, config.fresh_articles)
        .await
        .map_err(BlogError::DataUnavailable)
}

/// Fetch an HTML fragment for a remote article body.
pub async fn fetch_fragment(url: &str) -> Result<String> {
    get_text(url, false).await.map_err(BlogError::ContentFetch)
}
