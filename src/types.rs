//! Shared types used across the router and its generators.
//!
//! The manifest types mirror `data/articles.json` exactly and are deserialized
//! once per navigation. Key order in the JSON file is significant: it is the
//! site's reading order, so every map here is an [`IndexMap`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Page identifier used when the route carries no `page` parameter.
pub const HOME_PAGE: &str = "home";

/// The whole content tree, keyed by category key in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub categories: IndexMap<String, Category>,
}

impl Manifest {
    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.get(key)
    }
}

/// A top-level grouping.
///
/// A well-formed category has either `subcategories` or `articles`. When a
/// malformed file carries both, subcategories win everywhere; when it carries
/// neither, listings for it are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<IndexMap<String, Subcategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<Article>>,
}

/// What a category holds, after applying the subcategories-first rule.
#[derive(Debug, Clone, Copy)]
pub enum CategoryContents<'a> {
    Subcategories(&'a IndexMap<String, Subcategory>),
    Articles(&'a [Article]),
    Empty,
}

impl Category {
    /// Display title, falling back to the category key.
    pub fn display_title<'a>(&'a self, key: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(key)
    }

    pub fn contents(&self) -> CategoryContents<'_> {
        match (&self.subcategories, &self.articles) {
            (Some(subs), _) => CategoryContents::Subcategories(subs),
            (None, Some(articles)) => CategoryContents::Articles(articles),
            (None, None) => CategoryContents::Empty,
        }
    }

    pub fn subcategory(&self, key: &str) -> Option<&Subcategory> {
        self.subcategories.as_ref()?.get(key)
    }
}

/// Second-level grouping under a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl Subcategory {
    pub fn display_title<'a>(&'a self, key: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(key)
    }
}

/// A single content page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier used both in the `page` query parameter and the fragment filename.
    pub page: String,
    pub title: String,
}

/// The `(cat, subcat, page)` triple read from the query string.
///
/// `subcat` is always `None` when `cat` is `None`; constructors enforce it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub cat: Option<String>,
    pub subcat: Option<String>,
    pub page: Option<String>,
}

impl Route {
    pub fn new(cat: Option<&str>, subcat: Option<&str>, page: Option<&str>) -> Self {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);
        let cat = non_empty(cat);
        let subcat = if cat.is_some() { non_empty(subcat) } else { None };
        Self {
            cat,
            subcat,
            page: non_empty(page),
        }
    }

    pub fn home() -> Self {
        Self::default()
    }

    /// The page identifier with the `home` default applied.
    pub fn page_or_home(&self) -> &str {
        self.page.as_deref().unwrap_or(HOME_PAGE)
    }

    pub fn cat(&self) -> Option<&str> {
        self.cat.as_deref()
    }

    pub fn subcat(&self) -> Option<&str> {
        self.subcat.as_deref()
    }

    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    /// Neither a page nor a category: the site's landing page.
    pub fn is_home(&self) -> bool {
        self.cat.is_none() && self.page.is_none()
    }
}

/// One article in document order, with its location in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub cat: String,
    pub subcat: Option<String>,
    pub page: String,
    pub title: String,
}

impl FlatEntry {
    /// Whether this entry is the article the route points at.
    pub fn matches(&self, cat: &str, subcat: Option<&str>, page: &str) -> bool {
        self.cat == cat && self.subcat.as_deref() == subcat && self.page == page
    }
}
