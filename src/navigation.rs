//! Previous/next article links.
//!
//! Neighbours come from the flattened document order, so the last article of
//! one category links forward into the first article of the next. Each link
//! carries a context line (`Category / Subcategory`) so a reader crossing a
//! category boundary can tell where they are going.

use crate::manifest::{flatten, lookup_title};
use crate::paths::build_article_url;
use crate::types::{FlatEntry, Manifest, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub direction: Direction,
    pub href: String,
    /// Title with the direction arrow, e.g. `← Balises`.
    pub label: String,
    /// Where the target lives, e.g. `Frontend / HTML`.
    pub context: String,
}

/// Links around the current article. Either side may be absent at the ends
/// of the document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleNav {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// Arrow glyphs placed before the previous label and after the next label.
#[derive(Debug, Clone, Copy)]
pub struct Arrows<'a> {
    pub previous: &'a str,
    pub next: &'a str,
}

impl Default for Arrows<'_> {
    fn default() -> Self {
        Self {
            previous: "←",
            next: "→",
        }
    }
}

/// Entries immediately before and after index `idx`.
pub fn neighbours(entries: &[FlatEntry], idx: usize) -> (Option<&FlatEntry>, Option<&FlatEntry>) {
    let previous = idx.checked_sub(1).and_then(|i| entries.get(i));
    let next = entries.get(idx + 1);
    (previous, next)
}

/// Compute navigation for `route`.
///
/// Returns `None` when the route has no category or page, or when the
/// article is not in the manifest.
pub fn article_nav(route: &Route, manifest: &Manifest, arrows: Arrows<'_>) -> Option<ArticleNav> {
    let cat = route.cat()?;
    let page = route.page()?;
    let entries = flatten(manifest);
    let idx = entries
        .iter()
        .position(|e| e.matches(cat, route.subcat(), page))?;

    let (previous, next) = neighbours(&entries, idx);
    Some(ArticleNav {
        previous: previous.map(|e| {
            nav_link(manifest, e, Direction::Previous, format!("{} {}", arrows.previous, e.title))
        }),
        next: next.map(|e| {
            nav_link(manifest, e, Direction::Next, format!("{} {}", e.title, arrows.next))
        }),
    })
}

fn nav_link(manifest: &Manifest, entry: &FlatEntry, direction: Direction, label: String) -> NavLink {
    NavLink {
        direction,
        href: build_article_url(&entry.cat, entry.subcat.as_deref(), &entry.page),
        label,
        context: context_label(manifest, entry),
    }
}

fn context_label(manifest: &Manifest, entry: &FlatEntry) -> String {
    let category = lookup_title(manifest, &entry.cat, None, None);
    match &entry.subcat {
        Some(subcat) => format!(
            "{category} / {}",
            lookup_title(manifest, &entry.cat, Some(subcat), None)
        ),
        None => category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use pretty_assertions::assert_eq;

    fn nav_for(cat: &str, subcat: Option<&str>, page: &str) -> Option<ArticleNav> {
        let route = Route::new(Some(cat), subcat, Some(page));
        article_nav(&route, &sample_manifest(), Arrows::default())
    }

    #[test]
    fn first_article_has_no_previous() {
        let nav = nav_for("01_Intro", None, "1.1").unwrap();
        assert_eq!(nav.previous, None);
        let next = nav.next.unwrap();
        assert_eq!(next.href, "index.html?cat=01_Intro&page=1.2");
        assert_eq!(next.label, "Installation →");
        assert_eq!(next.context, "Introduction");
    }

    #[test]
    fn last_article_has_no_next() {
        let nav = nav_for("03_Backend", None, "3.1").unwrap();
        assert_eq!(nav.next, None);
        let previous = nav.previous.unwrap();
        assert_eq!(previous.label, "← Sélecteurs");
        assert_eq!(previous.context, "Frontend / 02_CSS");
        assert_eq!(previous.href, "index.html?cat=02_Frontend&subcat=02_CSS&page=2.2.1");
    }

    #[test]
    fn crosses_category_boundaries() {
        let nav = nav_for("01_Intro", None, "1.2").unwrap();
        let next = nav.next.unwrap();
        assert_eq!(next.href, "index.html?cat=02_Frontend&subcat=01_HTML&page=2.1.1");
        assert_eq!(next.context, "Frontend / HTML");
        assert_eq!(next.direction, Direction::Next);
    }

    #[test]
    fn unknown_article_yields_nothing() {
        assert_eq!(nav_for("01_Intro", None, "nope"), None);
        // Right page, wrong container.
        assert_eq!(nav_for("02_Frontend", None, "2.1.1"), None);
    }

    #[test]
    fn route_without_category_yields_nothing() {
        let route = Route::new(None, None, Some("about"));
        assert_eq!(article_nav(&route, &sample_manifest(), Arrows::default()), None);
    }

    #[test]
    fn interior_entries_link_to_immediate_neighbours() {
        let entries = flatten(&sample_manifest());
        for idx in 1..entries.len() - 1 {
            let (previous, next) = neighbours(&entries, idx);
            assert_eq!(previous, Some(&entries[idx - 1]));
            assert_eq!(next, Some(&entries[idx + 1]));
        }
        assert_eq!(neighbours(&entries, 0).0, None);
        assert_eq!(neighbours(&entries, entries.len() - 1).1, None);
    }

    #[test]
    fn custom_arrows() {
        let route = Route::new(Some("01_Intro"), None, Some("1.2"));
        let arrows = Arrows {
            previous: "«",
            next: "»",
        };
        let nav = article_nav(&route, &sample_manifest(), arrows).unwrap();
        assert_eq!(nav.previous.unwrap().label, "« Bienvenue");
        assert_eq!(nav.next.unwrap().label, "Balises »");
    }
}
