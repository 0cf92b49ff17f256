//! Link trees for listings, the sitewide index, and the dropdown menu.
//!
//! Builders here only shape data into [`LinkNode`] trees; turning a tree into
//! markup is the job of [`crate::render`]. Group nodes (categories,
//! subcategories) carry no link, leaf nodes link to an article.

use crate::paths::build_article_url;
use crate::types::{Article, Category, CategoryContents, Manifest};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    pub label: String,
    pub href: Option<String>,
    pub children: Vec<LinkNode>,
}

impl LinkNode {
    pub fn leaf(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
            children: Vec::new(),
        }
    }

    pub fn group(label: impl Into<String>, children: Vec<LinkNode>) -> Self {
        Self {
            label: label.into(),
            href: None,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.href.is_some()
    }

    /// Number of leaves under (and including) this node.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(LinkNode::leaf_count).sum()
        }
    }
}

/// The listing for one category or subcategory route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub nodes: Vec<LinkNode>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingMiss {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("unknown subcategory '{subcat}' in category '{cat}'")]
    UnknownSubcategory { cat: String, subcat: String },
}

/// How article leaves are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafLabel {
    Title,
    /// `"{page} - {title}"`, as the dropdown menu shows them.
    PageAndTitle,
}

fn article_leaves(cat: &str, subcat: Option<&str>, articles: &[Article], style: LeafLabel) -> Vec<LinkNode> {
    articles
        .iter()
        .map(|a| {
            let label = match style {
                LeafLabel::Title => a.title.clone(),
                LeafLabel::PageAndTitle => format!("{} - {}", a.page, a.title),
            };
            LinkNode::leaf(label, build_article_url(cat, subcat, &a.page))
        })
        .collect()
}

/// Children of one category: a group per subcategory, or a flat run of leaves.
fn category_children(cat: &str, category: &Category, style: LeafLabel) -> Vec<LinkNode> {
    match category.contents() {
        CategoryContents::Subcategories(subs) => subs
            .iter()
            .map(|(sub_key, sub)| {
                LinkNode::group(
                    sub.display_title(sub_key),
                    article_leaves(cat, Some(sub_key), &sub.articles, style),
                )
            })
            .collect(),
        CategoryContents::Articles(articles) => article_leaves(cat, None, articles, style),
        CategoryContents::Empty => Vec::new(),
    }
}

/// Listing for a category, or for one of its subcategories.
pub fn category_listing(manifest: &Manifest, cat: &str, subcat: Option<&str>) -> Result<Listing, ListingMiss> {
    let category = manifest
        .category(cat)
        .ok_or_else(|| ListingMiss::UnknownCategory(cat.to_string()))?;

    match subcat {
        None => Ok(Listing {
            title: category.display_title(cat).to_string(),
            nodes: category_children(cat, category, LeafLabel::Title),
        }),
        Some(subcat) => {
            let sub = category
                .subcategory(subcat)
                .ok_or_else(|| ListingMiss::UnknownSubcategory {
                    cat: cat.to_string(),
                    subcat: subcat.to_string(),
                })?;
            Ok(Listing {
                title: sub.display_title(subcat).to_string(),
                nodes: article_leaves(cat, Some(subcat), &sub.articles, LeafLabel::Title),
            })
        }
    }
}

/// Every category as a titled section, for the sitewide sidebar.
pub fn site_index(manifest: &Manifest) -> Vec<LinkNode> {
    manifest
        .categories
        .iter()
        .map(|(key, category)| {
            LinkNode::group(
                category.display_title(key),
                category_children(key, category, LeafLabel::Title),
            )
        })
        .collect()
}

/// One dropdown per category, with `page - title` labels.
pub fn menu_tree(manifest: &Manifest) -> Vec<LinkNode> {
    manifest
        .categories
        .iter()
        .map(|(key, category)| {
            LinkNode::group(
                category.display_title(key),
                category_children(key, category, LeafLabel::PageAndTitle),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_manifest;
    use crate::test_helpers::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_article_category() {
        let manifest =
            parse_manifest(r#"{"A": {"title": "Cat A", "articles": [{"page": "x", "title": "X"}]}}"#)
                .unwrap();
        let listing = category_listing(&manifest, "A", None).unwrap();
        assert_eq!(listing.title, "Cat A");
        assert_eq!(
            listing.nodes,
            vec![LinkNode::leaf("X", build_article_url("A", None, "x"))]
        );
    }

    #[test]
    fn unknown_category() {
        let manifest = sample_manifest();
        assert_eq!(
            category_listing(&manifest, "ZZZ", None),
            Err(ListingMiss::UnknownCategory("ZZZ".into()))
        );
    }

    #[test]
    fn unknown_subcategory() {
        let manifest = sample_manifest();
        assert_eq!(
            category_listing(&manifest, "02_Frontend", Some("nope")),
            Err(ListingMiss::UnknownSubcategory {
                cat: "02_Frontend".into(),
                subcat: "nope".into()
            })
        );
        // A category with direct articles has no subcategories at all.
        assert!(category_listing(&manifest, "01_Intro", Some("x")).is_err());
    }

    #[test]
    fn category_with_subcategories_groups_articles() {
        let listing = category_listing(&sample_manifest(), "02_Frontend", None).unwrap();
        let groups: Vec<&str> = listing.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(groups, vec!["HTML", "02_CSS"]);
        assert_eq!(listing.nodes[0].children.len(), 2);
        assert_eq!(
            listing.nodes[1].children[0].href.as_deref(),
            Some("index.html?cat=02_Frontend&subcat=02_CSS&page=2.2.1")
        );
    }

    #[test]
    fn subcategory_listing_is_flat() {
        let listing = category_listing(&sample_manifest(), "02_Frontend", Some("01_HTML")).unwrap();
        assert_eq!(listing.title, "HTML");
        assert!(listing.nodes.iter().all(LinkNode::is_leaf));
        assert_eq!(listing.nodes[1].label, "Formulaires");
    }

    #[test]
    fn empty_category_lists_nothing() {
        let manifest = parse_manifest(r#"{"E": {"title": "Empty"}}"#).unwrap();
        let listing = category_listing(&manifest, "E", None).unwrap();
        assert!(listing.nodes.is_empty());
    }

    #[test]
    fn site_index_covers_every_article() {
        let index = site_index(&sample_manifest());
        let titles: Vec<&str> = index.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(titles, vec!["Introduction", "Frontend", "03_Backend"]);
        let leaves: usize = index.iter().map(LinkNode::leaf_count).sum();
        assert_eq!(leaves, 6);
    }

    #[test]
    fn menu_labels_include_page_id() {
        let menu = menu_tree(&sample_manifest());
        assert_eq!(menu[0].children[0].label, "1.1 - Bienvenue");
        assert_eq!(menu[1].children[0].label, "HTML");
        assert_eq!(menu[1].children[0].children[1].label, "2.1.2 - Formulaires");
    }
}
