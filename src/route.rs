//! URL fragment grammar.
//!
//! ```text
//! #/                    list
//! #/post/<slug>         detail
//! #/post?slug=<slug>    detail
//! #/contact             contact
//! anything else         list
//! ```

use std::fmt;

/// A fragment split into its path and decoded query pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Fragment {
    /// Split a raw fragment (`#/post?slug=a`, `/post?slug=a` or empty).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw, ""),
        };

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_query(key), decode_query(value))
            })
            .collect();

        Self {
            path: path.to_string(),
            params,
        }
    }

    /// First value for `key`, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

/// Query components use form encoding, where `+` is a space.
fn decode_query(s: &str) -> String {
    decode(&s.replace('+', " "))
}

/// A terminal view-state of the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    List,
    Detail { slug: String },
    Contact,
}

impl Route {
    /// Map a raw fragment to a route. Never fails: anything unrecognized,
    /// including a detail route with an empty slug, is the list.
    pub fn parse(raw: &str) -> Self {
        Self::from_fragment(&Fragment::parse(raw))
    }

    pub fn from_fragment(fragment: &Fragment) -> Self {
        let Some(path) = fragment.path.strip_prefix('/') else {
            return Route::List;
        };
        let segments: Vec<&str> = path
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split('/')
            .collect();

        match segments.as_slice() {
            ["post", slug] => Self::detail(&decode(slug)),
            ["post"] => Self::detail(fragment.param("slug").unwrap_or_default()),
            ["contact"] => Route::Contact,
            _ => Route::List,
        }
    }

    fn detail(slug: &str) -> Self {
        let slug = slug.trim();
        if slug.is_empty() {
            Route::List
        } else {
            Route::Detail {
                slug: slug.to_string(),
            }
        }
    }

    /// Canonical fragment for this route, including the leading `#`.
    pub fn to_fragment(&self) -> String {
        match self {
            Route::List => "#/".to_string(),
            Route::Detail { slug } => format!("#/post/{}", urlencoding::encode(slug)),
            Route::Contact => "#/contact".to_string(),
        }
    }

    /// Slug of a detail route.
    pub fn slug(&self) -> Option<&str> {
        match self {
            Route::Detail { slug } => Some(slug),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fragment())
    }
}

/// Link target for the detail page of `slug`.
pub fn post_href(slug: &str) -> String {
    Route::Detail {
        slug: slug.to_string(),
    }
    .to_fragment()
}
