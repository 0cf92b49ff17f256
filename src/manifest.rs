//! Manifest walking: document order, point lookups, structural checks.
//!
//! Every generator reads the content tree through this module. Lookups never
//! fail: a miss yields an empty slice, `None`, or a raw key, and the caller
//! decides how to degrade.
//!
//! ## Document Order
//!
//! [`flatten`] produces the canonical reading order used for previous/next
//! links:
//!
//! ```text
//! for each category (declaration order)
//!     for each subcategory (declaration order)
//!         its articles (sequence order)
//!     or, for a category with direct articles, those (sequence order)
//! ```

use crate::types::{Article, CategoryContents, FlatEntry, Manifest};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Parse `articles.json` content.
pub fn parse_manifest(json: &str) -> Result<Manifest, serde_json::Error> {
    serde_json::from_str(json)
}

/// All articles in document order.
pub fn flatten(manifest: &Manifest) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    for (cat_key, category) in &manifest.categories {
        match category.contents() {
            CategoryContents::Subcategories(subs) => {
                for (sub_key, sub) in subs {
                    push_articles(&mut entries, cat_key, Some(sub_key), &sub.articles);
                }
            }
            CategoryContents::Articles(articles) => {
                push_articles(&mut entries, cat_key, None, articles);
            }
            CategoryContents::Empty => {}
        }
    }
    entries
}

fn push_articles(entries: &mut Vec<FlatEntry>, cat: &str, subcat: Option<&str>, articles: &[Article]) {
    entries.extend(articles.iter().map(|a| FlatEntry {
        cat: cat.to_string(),
        subcat: subcat.map(str::to_string),
        page: a.page.clone(),
        title: a.title.clone(),
    }));
}

/// Articles of one container.
///
/// With `subcat`, the subcategory's articles; without, the category's direct
/// articles. Anything unknown yields an empty slice.
pub fn lookup_articles<'a>(manifest: &'a Manifest, cat: &str, subcat: Option<&str>) -> &'a [Article] {
    let Some(category) = manifest.category(cat) else {
        return &[];
    };
    match subcat {
        Some(subcat) => category
            .subcategory(subcat)
            .map(|s| s.articles.as_slice())
            .unwrap_or(&[]),
        None => match category.contents() {
            CategoryContents::Articles(articles) => articles,
            _ => &[],
        },
    }
}

/// A single article by its full location.
pub fn find_article<'a>(
    manifest: &'a Manifest,
    cat: &str,
    subcat: Option<&str>,
    page: &str,
) -> Option<&'a Article> {
    lookup_articles(manifest, cat, subcat)
        .iter()
        .find(|a| a.page == page)
}

/// Best display title for a location.
///
/// Falls back from the article title to the subcategory title, then the
/// category title, then the raw category key. Each title itself falls back
/// to its key when the manifest omits it.
pub fn lookup_title(manifest: &Manifest, cat: &str, subcat: Option<&str>, page: Option<&str>) -> String {
    if let Some(article) = page.and_then(|p| find_article(manifest, cat, subcat, p)) {
        return article.title.clone();
    }
    let Some(category) = manifest.category(cat) else {
        return cat.to_string();
    };
    if let Some(subcat) = subcat {
        if let Some(sub) = category.subcategory(subcat) {
            return sub.display_title(subcat).to_string();
        }
    }
    category.display_title(cat).to_string()
}

// =============================================================================
// Structural checks
// =============================================================================

/// Something wrong with the manifest or the fragments it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestIssue {
    /// Category declares both `subcategories` and `articles`.
    MixedCategory(String),
    /// Category declares neither `subcategories` nor `articles`.
    EmptyCategory(String),
    /// Same `page` twice in one container.
    DuplicatePage { container: String, page: String },
    /// Manifest article without a fragment file.
    MissingFragment { path: PathBuf },
    /// Fragment file under `content/articles/` no manifest article points at.
    OrphanFragment { path: PathBuf },
}

impl fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MixedCategory(cat) => {
                write!(f, "category '{cat}' has both subcategories and articles")
            }
            Self::EmptyCategory(cat) => {
                write!(f, "category '{cat}' has neither subcategories nor articles")
            }
            Self::DuplicatePage { container, page } => {
                write!(f, "page '{page}' appears more than once in '{container}'")
            }
            Self::MissingFragment { path } => write!(f, "missing fragment {}", path.display()),
            Self::OrphanFragment { path } => {
                write!(f, "fragment {} is not listed in the manifest", path.display())
            }
        }
    }
}

/// Check the category invariants and page uniqueness.
pub fn validate(manifest: &Manifest) -> Vec<ManifestIssue> {
    let mut issues = Vec::new();
    for (cat_key, category) in &manifest.categories {
        match (&category.subcategories, &category.articles) {
            (Some(_), Some(_)) => issues.push(ManifestIssue::MixedCategory(cat_key.clone())),
            (None, None) => issues.push(ManifestIssue::EmptyCategory(cat_key.clone())),
            _ => {}
        }
        if let Some(articles) = &category.articles {
            check_duplicates(&mut issues, cat_key.clone(), articles);
        }
        for (sub_key, sub) in category.subcategories.iter().flatten() {
            check_duplicates(&mut issues, format!("{cat_key}/{sub_key}"), &sub.articles);
        }
    }
    issues
}

fn check_duplicates(issues: &mut Vec<ManifestIssue>, container: String, articles: &[Article]) {
    let mut seen = HashSet::new();
    for article in articles {
        if !seen.insert(article.page.as_str()) {
            issues.push(ManifestIssue::DuplicatePage {
                container: container.clone(),
                page: article.page.clone(),
            });
        }
    }
}

/// Compare the manifest against the fragment files under `site_root`.
///
/// Reports articles whose fragment is missing and `.html` files under
/// `content/articles/` that no article references.
pub fn check_fragments(manifest: &Manifest, site_root: &Path) -> Vec<ManifestIssue> {
    let expected: Vec<PathBuf> = flatten(manifest)
        .iter()
        .map(|e| {
            PathBuf::from(crate::paths::resolve_path(
                Some(&e.cat),
                e.subcat.as_deref(),
                &e.page,
            ))
        })
        .collect();

    let mut issues: Vec<ManifestIssue> = expected
        .iter()
        .filter(|rel| !site_root.join(rel).is_file())
        .map(|rel| ManifestIssue::MissingFragment { path: rel.clone() })
        .collect();

    let known: HashSet<&Path> = expected.iter().map(PathBuf::as_path).collect();
    let articles_dir = site_root.join("content/articles");
    let mut orphans: Vec<PathBuf> = WalkDir::new(&articles_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
        .filter_map(|e| e.path().strip_prefix(site_root).ok().map(Path::to_path_buf))
        .filter(|rel| !known.contains(rel.as_path()))
        .collect();
    orphans.sort();
    issues.extend(orphans.into_iter().map(|path| ManifestIssue::OrphanFragment { path }));
    issues
}
