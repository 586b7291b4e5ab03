//! # blog-rs
//!
//! Core of a hash-routed teaching blog.
//!
//! The client shows a filterable list of articles loaded from a static JSON
//! collection, a detail page per article addressed by URL fragment, and
//! per-article comments kept in browser local storage. This crate holds the
//! parts that do not touch the DOM, so they can be tested natively:
//!
//! - **Articles**: the collection, slug lookup, adjacency and a load-once cache
//! - **Comments**: validated, append-only lists behind a key-value store
//! - **Routing**: fragment grammar and numbered navigations
//! - **State**: the view-state machine the web UI renders from
//! - **Builder**: Markdown sources to the JSON collection (`build-articles`)
//!
//! ## Example
//!
//! ```
//! use blog_rs::{Action, BlogState, Screen};
//!
//! let json = r#"[
//!     {"slug": "alpha", "title": "Lorem", "category": "Notes", "date": "2024-03-01"},
//!     {"slug": "beta", "title": "Flexbox", "category": "CSS", "date": "2024-03-02"}
//! ]"#;
//! let store = blog_rs::ArticleStore::from_json(json).unwrap();
//!
//! let mut state = BlogState::new("#/post/beta");
//! state.apply(Action::ArticlesLoaded(Ok(store.into())));
//!
//! match state.screen() {
//!     Screen::Detail(detail) => {
//!         assert_eq!(detail.meta, "CSS · 2024-03-02");
//!         assert_eq!(detail.prev.unwrap().slug, "alpha");
//!         assert!(detail.next.is_none());
//!     }
//!     _ => unreachable!(),
//! }
//! ```

pub mod article;
pub mod comment;
pub mod config;
pub mod content;
pub mod error;
pub mod filter;
pub mod route;
pub mod router;
pub mod state;
pub mod view;

pub use article::{Article, ArticleCache, ArticleStore, ContentSource, Neighbors};
pub use comment::{
    COMMENT_KEY_PREFIX, Comment, CommentDraft, CommentStore, KeyValueStore, MemoryStorage,
    comment_key,
};
pub use config::BuildConfig;
pub use content::{BuildReport, build_collection};
pub use error::{BlogError, Result};
pub use filter::ListFilter;
pub use route::{Fragment, Route, post_href};
pub use router::{Navigation, NavigationId, Router, Section};
pub use state::{Action, BlogState, Catalog, ContentRequest, Screen};
pub use view::{
    ARTICLES_UNAVAILABLE_MESSAGE, Body, CONTENT_FAILED_MESSAGE, DetailView, ListView, NavLink,
    meta_line,
};
