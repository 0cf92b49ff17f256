//! Path and URL construction for routes.
//!
//! The site has a single entry surface (`index.html`) and every internal link
//! points back at it with `cat`/`subcat`/`page` query parameters. Content
//! fragments live under `content/`:
//!
//! ```text
//! content/
//! ├── home.html                          # ?page=home or no parameters
//! ├── about.html                         # ?page=about
//! └── articles/
//!     ├── 01_Intro/
//!     │   └── 1.1.html                   # ?cat=01_Intro&page=1.1
//!     └── 02_Frontend/
//!         └── 01_HTML/
//!             └── 2.1.1.html             # ?cat=02_Frontend&subcat=01_HTML&page=2.1.1
//! ```
//!
//! Identifiers are assumed URL-safe, so link construction never escapes them.
//! Parsing a query string does decode `%XX` sequences and `+`, the way a
//! browser's `URLSearchParams` would.

use crate::types::Route;

/// Entry surface every generated link targets.
pub const ENTRY_POINT: &str = "index.html";

/// Fragment location for a route triple, relative to the site base.
///
/// - `cat` and `subcat` → `content/articles/{cat}/{subcat}/{page}.html`
/// - `cat` only → `content/articles/{cat}/{page}.html`
/// - neither → `content/{page}.html`
pub fn resolve_path(cat: Option<&str>, subcat: Option<&str>, page: &str) -> String {
    match (cat, subcat) {
        (Some(cat), Some(subcat)) => format!("content/articles/{cat}/{subcat}/{page}.html"),
        (Some(cat), None) => format!("content/articles/{cat}/{page}.html"),
        (None, _) => format!("content/{page}.html"),
    }
}

/// Link to an article on the entry surface.
pub fn build_article_url(cat: &str, subcat: Option<&str>, page: &str) -> String {
    match subcat {
        Some(subcat) => format!("{ENTRY_POINT}?cat={cat}&subcat={subcat}&page={page}"),
        None => format!("{ENTRY_POINT}?cat={cat}&page={page}"),
    }
}

/// Link to a category listing, or a subcategory listing when `subcat` is set.
pub fn build_listing_url(cat: &str, subcat: Option<&str>) -> String {
    match subcat {
        Some(subcat) => format!("{ENTRY_POINT}?cat={cat}&subcat={subcat}"),
        None => format!("{ENTRY_POINT}?cat={cat}"),
    }
}

/// Directory part of a location path, keeping the trailing slash.
///
/// `/docs/index.html` → `/docs/`, `/` → `/`, `index.html` → `` (relative root).
pub fn base_path(location_path: &str) -> String {
    match location_path.rfind('/') {
        Some(pos) => location_path[..=pos].to_string(),
        None => String::new(),
    }
}

/// Parse a route from a query string, with or without the leading `?`.
///
/// Unknown keys are ignored. When a key repeats, the first value wins.
pub fn parse_query(query: &str) -> Route {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut cat = None;
    let mut subcat = None;
    let mut page = None;

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let slot = match decode_component(key).as_str() {
            "cat" => &mut cat,
            "subcat" => &mut subcat,
            "page" => &mut page,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(decode_component(value));
        }
    }

    Route::new(cat.as_deref(), subcat.as_deref(), page.as_deref())
}

/// Decode one `application/x-www-form-urlencoded` component.
///
/// Malformed escapes are kept literally.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_nested_subcategory() {
        assert_eq!(
            resolve_path(Some("02_Frontend"), Some("01_HTML"), "2.1.1"),
            "content/articles/02_Frontend/01_HTML/2.1.1.html"
        );
    }

    #[test]
    fn resolve_category_only() {
        assert_eq!(
            resolve_path(Some("01_Intro"), None, "1.1"),
            "content/articles/01_Intro/1.1.html"
        );
    }

    #[test]
    fn resolve_top_level_page() {
        assert_eq!(resolve_path(None, None, "home"), "content/home.html");
    }

    #[test]
    fn resolve_ignores_subcat_without_cat() {
        assert_eq!(resolve_path(None, Some("orphan"), "about"), "content/about.html");
    }

    #[test]
    fn resolve_is_never_empty() {
        for cat in [None, Some("c")] {
            for subcat in [None, Some("s")] {
                let path = resolve_path(cat, subcat, "home");
                assert!(!path.is_empty());
                assert_eq!(path, resolve_path(cat, subcat, "home"));
            }
        }
    }

    #[test]
    fn article_url_without_subcat() {
        assert_eq!(build_article_url("A", None, "x"), "index.html?cat=A&page=x");
    }

    #[test]
    fn article_url_with_subcat() {
        assert_eq!(
            build_article_url("A", Some("s"), "x"),
            "index.html?cat=A&subcat=s&page=x"
        );
    }

    #[test]
    fn listing_urls() {
        assert_eq!(build_listing_url("A", None), "index.html?cat=A");
        assert_eq!(build_listing_url("A", Some("s")), "index.html?cat=A&subcat=s");
    }

    #[test]
    fn base_path_strips_last_segment() {
        assert_eq!(base_path("/docs/index.html"), "/docs/");
        assert_eq!(base_path("/docs/"), "/docs/");
        assert_eq!(base_path("/"), "/");
        assert_eq!(base_path("index.html"), "");
    }

    #[test]
    fn parse_full_query() {
        let route = parse_query("?cat=02_Frontend&subcat=01_HTML&page=2.1.1");
        assert_eq!(route.cat(), Some("02_Frontend"));
        assert_eq!(route.subcat(), Some("01_HTML"));
        assert_eq!(route.page(), Some("2.1.1"));
    }

    #[test]
    fn parse_empty_query_is_home() {
        assert!(parse_query("").is_home());
        assert!(parse_query("?").is_home());
    }

    #[test]
    fn parse_decodes_escapes() {
        let route = parse_query("cat=Node%2Ejs&page=a+b");
        assert_eq!(route.cat(), Some("Node.js"));
        assert_eq!(route.page(), Some("a b"));
    }

    #[test]
    fn parse_keeps_malformed_escape() {
        let route = parse_query("page=100%");
        assert_eq!(route.page(), Some("100%"));
        let route = parse_query("page=%zz");
        assert_eq!(route.page(), Some("%zz"));
    }

    #[test]
    fn parse_first_value_wins_and_unknown_keys_ignored() {
        let route = parse_query("page=a&page=b&lang=fr");
        assert_eq!(route.page(), Some("a"));
        assert_eq!(route.cat(), None);
    }

    #[test]
    fn parse_subcat_without_cat_is_dropped() {
        let route = parse_query("subcat=s&page=p");
        assert_eq!(route.subcat(), None);
    }

    #[test]
    fn parse_key_without_value() {
        let route = parse_query("cat&page=x");
        assert_eq!(route.cat(), None);
        assert_eq!(route.page(), Some("x"));
    }
}
