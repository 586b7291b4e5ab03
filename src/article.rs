//! Article collection: the record shape, slug lookup and the load-once cache.
//!
//! The collection is a JSON array fetched from a static resource. Its order
//! is meaningful: it defines previous/next adjacency on the detail page.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures_util::future::{FutureExt, LocalBoxFuture, Shared};
use serde::{Deserialize, Serialize};

use crate::error::{BlogError, Result};

/// One article as stored in the static collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, rename = "class", skip_serializing_if = "String::is_empty")]
    pub class_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub student: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Where the body of an article comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource<'a> {
    /// Trusted markup shipped inside the collection.
    Inline(&'a str),
    /// A URL returning an HTML fragment.
    Remote(&'a str),
    /// Neither source is set.
    Missing,
}

impl Article {
    /// Pick the body source. Empty strings count as absent.
    pub fn content_source(&self) -> ContentSource<'_> {
        match (self.content_html.as_deref(), self.content_url.as_deref()) {
            (Some(html), _) if !html.is_empty() => ContentSource::Inline(html),
            (_, Some(url)) if !url.is_empty() => ContentSource::Remote(url),
            _ => ContentSource::Missing,
        }
    }
}

/// Previous and next articles around a position in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors<'a> {
    pub prev: Option<&'a Article>,
    pub next: Option<&'a Article>,
}

/// The loaded, ordered article collection with a slug index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleStore {
    articles: Vec<Article>,
    by_slug: HashMap<String, usize>,
}

impl ArticleStore {
    /// Build a store from articles in display order.
    ///
    /// Slugs should be unique; if one repeats, the first occurrence is the
    /// one lookups return.
    pub fn new(articles: Vec<Article>) -> Self {
        let mut by_slug = HashMap::with_capacity(articles.len());
        for (idx, article) in articles.iter().enumerate() {
            if by_slug.contains_key(&article.slug) {
                log::warn!("duplicate article slug `{}` at position {}", article.slug, idx);
                continue;
            }
            by_slug.insert(article.slug.clone(), idx);
        }
        Self { articles, by_slug }
    }

    /// Parse the JSON collection body.
    pub fn from_json(body: &str) -> Result<Self> {
        let articles: Vec<Article> = serde_json::from_str(body)
            .map_err(|e| BlogError::DataUnavailable(format!("invalid article JSON: {e}")))?;
        Ok(Self::new(articles))
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Article> {
        self.index_of(slug).map(|idx| &self.articles[idx])
    }

    /// Position of `slug` in collection order, `None` when absent.
    pub fn index_of(&self, slug: &str) -> Option<usize> {
        self.by_slug.get(slug).copied()
    }

    pub fn neighbors(&self, idx: usize) -> Neighbors<'_> {
        if idx >= self.articles.len() {
            return Neighbors {
                prev: None,
                next: None,
            };
        }
        Neighbors {
            prev: idx.checked_sub(1).and_then(|i| self.articles.get(i)),
            next: self.articles.get(idx + 1),
        }
    }

    /// Distinct non-empty categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for article in &self.articles {
            let category = article.category.as_str();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }
}

type PendingLoad = Shared<LocalBoxFuture<'static, Result<Rc<ArticleStore>>>>;

/// Load-once holder for the article collection.
///
/// The first successful [`ArticleCache::load`] stores the collection; later
/// calls hand out the same `Rc` without invoking the fetcher. Calls made
/// while a fetch is in flight await that fetch instead of starting another.
/// A failed load leaves the cache empty so the next navigation can try again.
#[derive(Default)]
pub struct ArticleCache {
    slot: RefCell<Option<Rc<ArticleStore>>>,
    pending: RefCell<Option<PendingLoad>>,
}

impl fmt::Debug for ArticleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleCache")
            .field("slot", &self.slot)
            .field("pending", &self.pending.borrow().is_some())
            .finish()
    }
}

impl ArticleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached collection, if one has been loaded.
    pub fn cached(&self) -> Option<Rc<ArticleStore>> {
        self.slot.borrow().clone()
    }

    /// True while a fetch started by [`ArticleCache::load`] is unresolved.
    pub fn is_loading(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Return the cached collection or fetch and parse it.
    ///
    /// `fetch` yields the raw JSON body and is only called when nothing is
    /// cached or in flight. Any failure is reported as
    /// [`BlogError::DataUnavailable`].
    pub async fn load<F, Fut>(&self, fetch: F) -> Result<Rc<ArticleStore>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>> + 'static,
    {
        if let Some(store) = self.cached() {
            return Ok(store);
        }

        let pending = self
            .pending
            .borrow_mut()
            .get_or_insert_with(|| fetch_and_parse(fetch()))
            .clone();
        let result = pending.clone().await;

        {
            let mut in_flight = self.pending.borrow_mut();
            if in_flight.as_ref().is_some_and(|p| p.ptr_eq(&pending)) {
                *in_flight = None;
            }
        }
        if let Ok(store) = &result {
            *self.slot.borrow_mut() = Some(store.clone());
        }
        result
    }
}

fn fetch_and_parse<Fut>(body: Fut) -> PendingLoad
where
    Fut: Future<Output = Result<String>> + 'static,
{
    async move {
        let body = body.await.map_err(|e| match e {
            BlogError::DataUnavailable(_) => e,
            other => BlogError::DataUnavailable(other.to_string()),
        })?;
        let store = Rc::new(ArticleStore::from_json(&body)?);
        log::debug!("loaded {} articles", store.len());
        Ok(store)
    }
    .boxed_local()
    .shared()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    pub(crate) const SAMPLE_JSON: &str = r#"[
        {"slug": "alpha", "title": "Lorem ipsum basics", "category": "Notes",
         "date": "2024-03-01", "excerpt": "First steps", "cover": "a.png",
         "contentHtml": "<p>alpha body</p>"},
        {"slug": "beta", "title": "Flexbox layouts", "category": "CSS",
         "date": "2024-03-02", "excerpt": "Dolor sit LOREM amet", "cover": "b.png",
         "contentUrl": "assets/articles/beta.html"},
        {"slug": "gamma", "title": "Events", "category": "Notes",
         "date": "2024-03-03", "excerpt": "Bubbling and capture"}
    ]"#;

    pub(crate) fn sample_store() -> ArticleStore {
        ArticleStore::from_json(SAMPLE_JSON).unwrap()
    }

    #[test]
    fn test_find_by_slug() {
        let store = sample_store();
        assert_eq!(store.len(), 3);
        for slug in ["alpha", "beta", "gamma"] {
            assert_eq!(store.find_by_slug(slug).unwrap().slug, slug);
        }
        assert!(store.find_by_slug("delta").is_none());
        assert!(store.find_by_slug("").is_none());
    }

    #[test]
    fn test_index_of() {
        let store = sample_store();
        assert_eq!(store.index_of("alpha"), Some(0));
        assert_eq!(store.index_of("gamma"), Some(2));
        assert_eq!(store.index_of("missing"), None);
    }

    #[test]
    fn test_duplicate_slug_keeps_first() {
        let store = ArticleStore::new(vec![
            Article {
                slug: "dup".into(),
                title: "First".into(),
                ..Default::default()
            },
            Article {
                slug: "dup".into(),
                title: "Second".into(),
                ..Default::default()
            },
        ]);
        assert_eq!(store.find_by_slug("dup").unwrap().title, "First");
        assert_eq!(store.index_of("dup"), Some(0));
    }

    #[test]
    fn test_neighbors_at_boundaries() {
        let store = sample_store();

        let first = store.neighbors(0);
        assert!(first.prev.is_none());
        assert_eq!(first.next.unwrap().slug, "beta");

        let middle = store.neighbors(1);
        assert_eq!(middle.prev.unwrap().slug, "alpha");
        assert_eq!(middle.next.unwrap().slug, "gamma");

        let last = store.neighbors(2);
        assert_eq!(last.prev.unwrap().slug, "beta");
        assert!(last.next.is_none());
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(sample_store().categories(), vec!["Notes", "CSS"]);
    }

    #[test]
    fn test_content_source() {
        let store = sample_store();
        assert_eq!(
            store.find_by_slug("alpha").unwrap().content_source(),
            ContentSource::Inline("<p>alpha body</p>")
        );
        assert_eq!(
            store.find_by_slug("beta").unwrap().content_source(),
            ContentSource::Remote("assets/articles/beta.html")
        );
        assert_eq!(
            store.find_by_slug("gamma").unwrap().content_source(),
            ContentSource::Missing
        );

        let empty_html = Article {
            content_html: Some(String::new()),
            content_url: Some("x.html".into()),
            ..Default::default()
        };
        assert_eq!(empty_html.content_source(), ContentSource::Remote("x.html"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = ArticleStore::from_json("{not json").unwrap_err();
        assert!(matches!(err, BlogError::DataUnavailable(_)));

        let err = ArticleStore::from_json(r#"{"slug": "a"}"#).unwrap_err();
        assert!(matches!(err, BlogError::DataUnavailable(_)));
    }

    #[test]
    fn test_builder_fields_round_trip() {
        let json = r#"[{"slug":"s","title":"T","class":"3-2","student":"Li","tags":["css"]}]"#;
        let store = ArticleStore::from_json(json).unwrap();
        let article = store.find_by_slug("s").unwrap();
        assert_eq!(article.class_name, "3-2");
        assert_eq!(article.student, "Li");
        assert_eq!(article.tags, vec!["css".to_string()]);

        let out = serde_json::to_string(article).unwrap();
        assert!(out.contains(r#""class":"3-2""#));
        assert!(!out.contains("contentHtml"));
    }

    #[tokio::test]
    async fn test_cache_fetches_once() {
        let cache = ArticleCache::new();
        let calls = Cell::new(0);

        for _ in 0..3 {
            let store = cache
                .load(|| {
                    calls.set(calls.get() + 1);
                    async { Ok(SAMPLE_JSON.to_string()) }
                })
                .await
                .unwrap();
            assert_eq!(store.len(), 3);
        }

        assert_eq!(calls.get(), 1);
        assert!(cache.cached().is_some());
    }

    #[tokio::test]
    async fn test_cache_failure_is_not_cached() {
        let cache = ArticleCache::new();

        let err = cache
            .load(|| async { Err(BlogError::ContentFetch("HTTP 404".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::DataUnavailable(_)));
        assert!(cache.cached().is_none());

        let err = cache
            .load(|| async { Ok("[oops".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::DataUnavailable(_)));

        let store = cache
            .load(|| async { Ok(SAMPLE_JSON.to_string()) })
            .await
            .unwrap();
        assert_eq!(store.index_of("beta"), Some(1));
    }

    #[tokio::test]
    async fn test_overlapping_loads_share_one_fetch() {
        let cache = ArticleCache::new();
        let calls = Cell::new(0);
        let fetch = || {
            calls.set(calls.get() + 1);
            async {
                tokio::task::yield_now().await;
                Ok(SAMPLE_JSON.to_string())
            }
        };

        let (first, second) = tokio::join!(cache.load(fetch), cache.load(fetch));

        assert_eq!(calls.get(), 1, "collection fetched more than once");
        assert!(Rc::ptr_eq(&first.unwrap(), &second.unwrap()));
        assert!(!cache.is_loading());
        assert!(cache.cached().is_some());
    }

    #[tokio::test]
    async fn test_overlapping_failure_allows_retry() {
        let cache = ArticleCache::new();
        let calls = Cell::new(0);
        let failing = || {
            calls.set(calls.get() + 1);
            async {
                tokio::task::yield_now().await;
                Err(BlogError::ContentFetch("HTTP 503".into()))
            }
        };

        let (first, second) = tokio::join!(cache.load(failing), cache.load(failing));
        assert_eq!(calls.get(), 1);
        assert!(matches!(first, Err(BlogError::DataUnavailable(_))));
        assert_eq!(first, second);
        assert!(!cache.is_loading());

        let store = cache
            .load(|| async { Ok(SAMPLE_JSON.to_string()) })
            .await
            .unwrap();
        assert_eq!(store.len(), 3);
    }
}
