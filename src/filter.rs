//! Search and category filtering for the list view.

use crate::article::Article;

/// Current list filter: a free-text query and an optional category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    input: String,
    needle: String,
    category: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text. Surrounding whitespace is ignored.
    pub fn with_query(mut self, query: &str) -> Self {
        self.set_query(query);
        self
    }

    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.select_category(category);
        self
    }

    pub fn set_query(&mut self, query: &str) {
        self.input = query.to_string();
        self.needle = query.trim().to_lowercase();
    }

    /// Select a category; `None` or an empty string shows every category.
    pub fn select_category(&mut self, category: Option<&str>) {
        self.category = category.filter(|c| !c.is_empty()).map(str::to_string);
    }

    /// The query as typed.
    pub fn query(&self) -> &str {
        &self.input
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// True if `article` passes both the category and the query test.
    pub fn matches(&self, article: &Article) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| article.category == c);
        if !category_ok {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }
        let haystack = format!("{}{}", article.title, article.excerpt).to_lowercase();
        haystack.contains(&self.needle)
    }

    /// Matching articles in collection order.
    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }
}
