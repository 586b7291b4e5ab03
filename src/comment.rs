//! Per-article comments persisted in a key-value store.
//!
//! Nothing is kept in memory: every read and write round-trips through the
//! backing [`KeyValueStore`], which is the source of truth. Writes replace
//! the whole list for an article, so two tabs appending at once resolve as
//! last writer wins.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BlogError, Result};

/// Prefix for every comment list key.
pub const COMMENT_KEY_PREFIX: &str = "comments:";

/// Storage key holding the comments of `slug`.
pub fn comment_key(slug: &str) -> String {
    format!("{COMMENT_KEY_PREFIX}{slug}")
}

/// Minimal string key-value storage, shaped after `window.localStorage`.
pub trait KeyValueStore {
    /// Raw value under `key`, `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory [`KeyValueStore`]. Clones share the same entries, so a fresh
/// store built over a clone behaves like a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A stored comment. `name` and `text` are untrusted plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub name: String,
    pub text: String,
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub ts: i64,
}

impl Comment {
    /// Creation time in the viewer's local time zone.
    pub fn display_time(&self) -> String {
        self.display_time_in(&Local)
    }

    /// Creation time rendered in `tz`. A zero or out-of-range timestamp
    /// shows the current time.
    pub fn display_time_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let instant = match self.ts {
            0 => None,
            ts => DateTime::<Utc>::from_timestamp_millis(ts),
        }
        .unwrap_or_else(Utc::now);
        instant
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Form input for a new comment, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub name: String,
    pub text: String,
}

impl CommentDraft {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Append-only comment lists keyed by article slug.
#[derive(Debug, Clone)]
pub struct CommentStore<S> {
    storage: S,
    clock: fn() -> i64,
}

impl<S: KeyValueStore> CommentStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, now_millis)
    }

    /// Use `clock` (epoch milliseconds) to stamp new comments.
    pub fn with_clock(storage: S, clock: fn() -> i64) -> Self {
        Self { storage, clock }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Comments for `slug` in submission order.
    ///
    /// Missing, unreadable or corrupt values all read as an empty list.
    pub fn list_for(&self, slug: &str) -> Vec<Comment> {
        match self.read(slug) {
            Ok(comments) => comments,
            Err(e) => {
                log::warn!("{e}; treating as empty");
                Vec::new()
            }
        }
    }

    fn read(&self, slug: &str) -> Result<Vec<Comment>> {
        let key = comment_key(slug);
        match self.storage.get(&key)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| BlogError::StorageCorrupt {
                key,
                reason: e.to_string(),
            }),
        }
    }

    /// Validate `draft`, stamp it, and persist it at the end of `slug`'s list.
    ///
    /// Returns the stored comment. On a validation error nothing is written.
    pub fn append(&self, slug: &str, draft: CommentDraft) -> Result<Comment> {
        let name = draft.name.trim();
        let text = draft.text.trim();
        if name.is_empty() {
            return Err(BlogError::Validation("name is required".into()));
        }
        if text.is_empty() {
            return Err(BlogError::Validation("comment text is required".into()));
        }

        let comment = Comment {
            name: name.to_string(),
            text: text.to_string(),
            ts: (self.clock)(),
        };

        let mut comments = self.list_for(slug);
        comments.push(comment.clone());
        let encoded = serde_json::to_string(&comments)
            .map_err(|e| BlogError::StorageUnavailable(e.to_string()))?;
        self.storage.set(&comment_key(slug), &encoded)?;

        Ok(comment)
    }
}
