//! Application state machine for the client.
//!
//! [`BlogState`] owns the router, the article catalog and the list filter.
//! The UI feeds it [`Action`]s (fragment changes, fetch completions, filter
//! input) and renders whatever [`BlogState::screen`] returns. Fetches are
//! requested, not performed, here: the UI asks [`BlogState::needs_articles`]
//! and [`BlogState::content_request`] what to load.

use std::rc::Rc;

use crate::article::{ArticleStore, ContentSource};
use crate::error::{BlogError, Result};
use crate::filter::ListFilter;
use crate::route::Route;
use crate::router::{Navigation, NavigationId, Router, Section};
use crate::view::{Body, CONTENT_FAILED_MESSAGE, DetailView, ListView};

/// Load state of the article collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Catalog {
    Loading,
    Ready(Rc<ArticleStore>),
    Unavailable(BlogError),
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The URL fragment changed.
    Navigate(String),
    ArticlesLoaded(Result<Rc<ArticleStore>>),
    /// A remote article body finished loading for navigation `nav`.
    ContentLoaded {
        nav: NavigationId,
        slug: String,
        result: Result<String>,
    },
    SetQuery(String),
    /// `None` shows all categories.
    SelectCategory(Option<String>),
}

/// A remote body the UI should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub nav: NavigationId,
    pub slug: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LoadedContent {
    nav: NavigationId,
    result: Result<String>,
}

/// What the visible section should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<'a> {
    /// The collection has not arrived yet.
    Loading,
    /// The collection failed to load; show an empty state.
    Unavailable(&'a BlogError),
    List(ListView<'a>),
    Detail(DetailView<'a>),
    NotFound(&'a str),
    Contact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogState {
    router: Router,
    catalog: Catalog,
    filter: ListFilter,
    content: Option<LoadedContent>,
}

impl BlogState {
    /// Initial state for a page opened at `fragment`.
    pub fn new(fragment: &str) -> Self {
        Self {
            router: Router::new(fragment),
            catalog: Catalog::Loading,
            filter: ListFilter::new(),
            content: None,
        }
    }

    pub fn navigation(&self) -> &Navigation {
        self.router.current()
    }

    pub fn route(&self) -> &Route {
        self.router.route()
    }

    pub fn section(&self) -> Section {
        self.router.visible_section()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Navigate(fragment) => {
                self.router.navigate(&fragment);
                self.content = None;
                if matches!(self.catalog, Catalog::Unavailable(_)) {
                    // Re-navigating is how the user retries a failed load.
                    self.catalog = Catalog::Loading;
                }
            }
            Action::ArticlesLoaded(Ok(store)) => self.catalog = Catalog::Ready(store),
            Action::ArticlesLoaded(Err(e)) => {
                log::warn!("{e}");
                self.catalog = Catalog::Unavailable(e);
            }
            Action::ContentLoaded { nav, slug, result } => {
                if !self.router.is_current(nav) || self.route().slug() != Some(slug.as_str()) {
                    log::debug!(
                        "dropping stale content for `{slug}` (navigation {})",
                        nav.get()
                    );
                    return;
                }
                if let Err(e) = &result {
                    log::warn!("{e}");
                }
                self.content = Some(LoadedContent { nav, result });
            }
            Action::SetQuery(query) => self.filter.set_query(&query),
            Action::SelectCategory(category) => self.filter.select_category(category.as_deref()),
        }
    }

    /// True when the current route needs the collection and no load has
    /// succeeded yet.
    pub fn needs_articles(&self) -> bool {
        matches!(self.catalog, Catalog::Loading) && self.section() != Section::Contact
    }

    /// The remote body the current detail page is waiting for, if any.
    pub fn content_request(&self) -> Option<ContentRequest> {
        let Catalog::Ready(store) = &self.catalog else {
            return None;
        };
        let slug = self.route().slug()?;
        if self.content.is_some() {
            return None;
        }
        match store.find_by_slug(slug)?.content_source() {
            ContentSource::Remote(url) => Some(ContentRequest {
                nav: self.navigation().id,
                slug: slug.to_string(),
                url: url.to_string(),
            }),
            _ => None,
        }
    }

    pub fn screen(&self) -> Screen<'_> {
        let store = match (&self.catalog, self.route()) {
            (_, Route::Contact) => return Screen::Contact,
            (Catalog::Loading, _) => return Screen::Loading,
            (Catalog::Unavailable(e), _) => return Screen::Unavailable(e),
            (Catalog::Ready(store), _) => store,
        };

        match self.route() {
            Route::Detail { slug } => match DetailView::build(store, slug) {
                Ok(mut detail) => {
                    detail.body = self.body_for(detail.article.content_source());
                    Screen::Detail(detail)
                }
                Err(_) => Screen::NotFound(slug),
            },
            _ => Screen::List(ListView::build(store, &self.filter)),
        }
    }

    fn body_for(&self, source: ContentSource<'_>) -> Body {
        match source {
            ContentSource::Inline(html) => Body::Markup(html.to_string()),
            ContentSource::Missing => Body::Empty,
            ContentSource::Remote(_) => match &self.content {
                Some(LoadedContent { nav, result }) if self.router.is_current(*nav) => {
                    match result {
                        Ok(html) => Body::Markup(html.clone()),
                        Err(_) => Body::Failed(CONTENT_FAILED_MESSAGE.to_string()),
                    }
                }
                _ => Body::Loading,
            },
        }
    }
}
