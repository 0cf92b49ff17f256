//! The rendering surface the router writes to.
//!
//! A page is a handful of addressable regions. The router replaces a region
//! wholesale (fragment injection, listings, layout partials) or appends to it
//! (breadcrumb and article navigation after the fragment). A page may lack
//! any region; writing to a missing one is an error the caller decides how
//! to absorb.
//!
//! [`Document`] is the in-memory surface used by the CLI and the tests. It
//! renders to a complete HTML page with [`Document::to_html`].

use crate::render::base_document;
use maud::{Markup, PreEscaped, html};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Header,
    Menu,
    Content,
    ArticleList,
    Footer,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Header,
        Region::Menu,
        Region::Content,
        Region::ArticleList,
        Region::Footer,
    ];

    /// Element id used for the region in rendered pages.
    pub fn id(self) -> &'static str {
        match self {
            Region::Header => "header",
            Region::Menu => "menu",
            Region::Content => "content",
            Region::ArticleList => "article-list",
            Region::Footer => "footer",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("region {0} not found")]
    MissingRegion(Region),
}

/// Write access to the page being rendered.
pub trait Surface {
    fn has_region(&self, region: Region) -> bool;

    /// Replace everything in `region` with `markup`.
    fn replace(&mut self, region: Region, markup: Markup) -> Result<(), SurfaceError>;

    /// Add `markup` after the current content of `region`.
    fn append(&mut self, region: Region, markup: Markup) -> Result<(), SurfaceError>;

    fn set_title(&mut self, title: &str);
}

/// In-memory page with a fixed set of regions.
#[derive(Debug, Clone, Default)]
pub struct Document {
    title: String,
    regions: BTreeMap<Region, String>,
}

impl Document {
    /// A document containing exactly `regions`, all empty.
    pub fn with_regions(regions: &[Region]) -> Self {
        Self {
            title: String::new(),
            regions: regions.iter().map(|r| (*r, String::new())).collect(),
        }
    }

    /// A document with every region.
    pub fn full() -> Self {
        Self::with_regions(&Region::ALL)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current HTML of a region, if the document has it.
    pub fn region(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    /// The complete page: regions in layout order inside the base shell.
    pub fn to_html(&self) -> Markup {
        let body = html! {
            @for region in Region::ALL {
                @if let Some(content) = self.regions.get(&region) {
                    @match region {
                        Region::Header => header id=(region.id()) { (PreEscaped(content)) },
                        Region::Menu => ul.navbar-nav id=(region.id()) { (PreEscaped(content)) },
                        Region::Content => main id=(region.id()) { (PreEscaped(content)) },
                        Region::ArticleList => aside id=(region.id()) { (PreEscaped(content)) },
                        Region::Footer => footer id=(region.id()) { (PreEscaped(content)) },
                    }
                }
            }
        };
        base_document(&self.title, body)
    }

    fn slot(&mut self, region: Region) -> Result<&mut String, SurfaceError> {
        self.regions
            .get_mut(&region)
            .ok_or(SurfaceError::MissingRegion(region))
    }
}

impl Surface for Document {
    fn has_region(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    fn replace(&mut self, region: Region, markup: Markup) -> Result<(), SurfaceError> {
        *self.slot(region)? = markup.into_string();
        Ok(())
    }

    fn append(&mut self, region: Region, markup: Markup) -> Result<(), SurfaceError> {
        self.slot(region)?.push_str(&markup.into_string());
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_then_append_keeps_order() {
        let mut doc = Document::full();
        doc.replace(Region::Content, html! { p { "fragment" } }).unwrap();
        doc.append(Region::Content, html! { nav { "crumbs" } }).unwrap();
        assert_eq!(
            doc.region(Region::Content),
            Some("<p>fragment</p><nav>crumbs</nav>")
        );
    }

    #[test]
    fn replace_discards_previous_content() {
        let mut doc = Document::full();
        doc.append(Region::Content, html! { "old" }).unwrap();
        doc.replace(Region::Content, html! { "new" }).unwrap();
        assert_eq!(doc.region(Region::Content), Some("new"));
    }

    #[test]
    fn missing_region_is_an_error() {
        let mut doc = Document::with_regions(&[Region::Content]);
        assert!(!doc.has_region(Region::Menu));
        assert_eq!(
            doc.replace(Region::Menu, html! { "x" }),
            Err(SurfaceError::MissingRegion(Region::Menu))
        );
        assert_eq!(doc.region(Region::Menu), None);
    }

    #[test]
    fn to_html_renders_present_regions_only() {
        let mut doc = Document::with_regions(&[Region::Content, Region::Footer]);
        doc.set_title("T - Site");
        doc.replace(Region::Content, html! { h1 { "T" } }).unwrap();
        let html = doc.to_html().into_string();
        assert!(html.contains("<title>T - Site</title>"));
        assert!(html.contains(r#"<main id="content"><h1>T</h1></main>"#));
        assert!(html.contains(r#"<footer id="footer"></footer>"#));
        assert!(!html.contains("article-list"));
    }

    #[test]
    fn region_display_is_a_selector() {
        assert_eq!(Region::ArticleList.to_string(), "#article-list");
    }
}
