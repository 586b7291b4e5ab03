//! View models: already-computed data the UI renders without further lookups.

use crate::article::{Article, ArticleStore};
use crate::error::{BlogError, Result};
use crate::filter::ListFilter;
use crate::route::post_href;

/// Meta line shown under a title: `category · date`.
pub fn meta_line(article: &Article) -> String {
    format!("{} · {}", article.category, article.date)
}

/// A link to a neighbouring article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub slug: String,
    pub title: String,
    pub href: String,
}

impl NavLink {
    fn to(article: &Article) -> Self {
        Self {
            slug: article.slug.clone(),
            title: article.title.clone(),
            href: post_href(&article.slug),
        }
    }
}

/// Article body as the detail view should show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Trusted markup, inline or fetched.
    Markup(String),
    /// A remote body is still being fetched.
    Loading,
    /// The remote body failed; show this text as plain text.
    Failed(String),
    Empty,
}

/// Message shown in place of a body whose fetch failed.
pub const CONTENT_FAILED_MESSAGE: &str = "Failed to load article content.";

/// Message shown while the collection is unavailable. Any navigation retries
/// the load.
pub const ARTICLES_UNAVAILABLE_MESSAGE: &str =
    "Articles are unavailable right now. Try again or open another page.";

/// Everything the detail page needs for one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView<'a> {
    pub article: &'a Article,
    pub meta: String,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
    pub body: Body,
}

impl<'a> DetailView<'a> {
    /// Build the detail view for `slug`, with an empty body.
    pub fn build(store: &'a ArticleStore, slug: &str) -> Result<Self> {
        let idx = store
            .index_of(slug)
            .ok_or_else(|| BlogError::NotFound(slug.to_string()))?;
        let article = &store.articles()[idx];
        let neighbors = store.neighbors(idx);
        Ok(Self {
            article,
            meta: meta_line(article),
            prev: neighbors.prev.map(NavLink::to),
            next: neighbors.next.map(NavLink::to),
            body: Body::Empty,
        })
    }
}

/// The filtered list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<'a> {
    /// Cards that pass the current filter, in collection order.
    pub cards: Vec<&'a Article>,
    /// Every article, for the index table.
    pub all: &'a [Article],
    pub categories: Vec<&'a str>,
    pub selected_category: Option<&'a str>,
}

impl<'a> ListView<'a> {
    pub fn build(store: &'a ArticleStore, filter: &'a ListFilter) -> Self {
        Self {
            cards: filter.apply(store.articles()),
            all: store.articles(),
            categories: store.categories(),
            selected_category: filter.category(),
        }
    }
}
