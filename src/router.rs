//! Fragment router: turns `hashchange` events into numbered navigations.
//!
//! Every call to [`Router::navigate`] issues a fresh [`NavigationId`], even
//! when the route is unchanged. Async work started for one navigation
//! carries its id and is dropped if a newer navigation has happened since.

use crate::route::Route;

/// Monotonic identifier of one navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavigationId(u64);

impl NavigationId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The route in effect and the navigation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub id: NavigationId,
    pub route: Route,
}

/// Page sections. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Posts,
    PostDetail,
    Contact,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Posts, Section::PostDetail, Section::Contact];

    /// DOM id of the section container.
    pub fn element_id(self) -> &'static str {
        match self {
            Section::Posts => "posts",
            Section::PostDetail => "post-detail",
            Section::Contact => "contact",
        }
    }

    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::List => Section::Posts,
            Route::Detail { .. } => Section::PostDetail,
            Route::Contact => Section::Contact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    issued: u64,
    current: Navigation,
}

impl Router {
    /// Start at the route of `initial_fragment` (the page's fragment on load).
    pub fn new(initial_fragment: &str) -> Self {
        Self {
            issued: 0,
            current: Navigation {
                id: NavigationId(0),
                route: Route::parse(initial_fragment),
            },
        }
    }

    /// Record a fragment change and return the resulting navigation.
    pub fn navigate(&mut self, fragment: &str) -> &Navigation {
        self.issued += 1;
        self.current = Navigation {
            id: NavigationId(self.issued),
            route: Route::parse(fragment),
        };
        log::debug!(
            "navigation {} -> {}",
            self.current.id.get(),
            self.current.route
        );
        &self.current
    }

    pub fn current(&self) -> &Navigation {
        &self.current
    }

    pub fn route(&self) -> &Route {
        &self.current.route
    }

    /// True while `id` is still the latest navigation.
    pub fn is_current(&self, id: NavigationId) -> bool {
        self.current.id == id
    }

    pub fn visible_section(&self) -> Section {
        Section::for_route(&self.current.route)
    }
}
