//! HTML rendering.
//!
//! All markup the router produces comes from here. The builders in
//! [`crate::listing`], [`crate::breadcrumb`] and [`crate::navigation`] hand
//! over plain data; these functions turn it into maud [`Markup`].
//!
//! Uses [maud](https://maud.lambda.xyz/) so every label and href is escaped
//! on interpolation. Fragments fetched from the site are trusted and go in
//! through [`PreEscaped`].

use crate::breadcrumb::Crumb;
use crate::listing::{LinkNode, Listing, menu_tree};
use crate::navigation::{ArticleNav, NavLink};
use crate::types::Manifest;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Signature of a menu generator the router can be configured with.
pub type MenuGenerator = fn(&Manifest) -> Markup;

// ============================================================================
// Document shell
// ============================================================================

/// Renders the base HTML document structure around already-rendered regions.
pub fn base_document(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                (body)
            }
        }
    }
}

/// Wrap a trusted HTML fragment.
pub fn fragment(html: &str) -> Markup {
    PreEscaped(html.to_string())
}

/// A user-visible fallback message.
pub fn message(text: &str) -> Markup {
    html! {
        p.message { (text) }
    }
}

// ============================================================================
// Link trees
// ============================================================================

/// Nested list of a link tree. Groups render as a label over their children.
pub fn render_tree(nodes: &[LinkNode]) -> Markup {
    html! {
        ul.link-list {
            @for node in nodes {
                (render_node(node))
            }
        }
    }
}

fn render_node(node: &LinkNode) -> Markup {
    html! {
        li {
            @match &node.href {
                Some(href) => a href=(href) { (node.label) },
                None => span.group-title { (node.label) },
            }
            @if !node.children.is_empty() {
                (render_tree(&node.children))
            }
        }
    }
}

/// A category or subcategory listing.
pub fn render_listing(listing: &Listing) -> Markup {
    html! {
        section.listing {
            h1 { (listing.title) }
            @if listing.nodes.iter().all(LinkNode::is_leaf) {
                (render_tree(&listing.nodes))
            } @else {
                @for group in &listing.nodes {
                    div.listing-group {
                        h2 { (group.label) }
                        (render_tree(&group.children))
                    }
                }
            }
        }
    }
}

/// The sitewide index: one section per category.
pub fn render_site_index(sections: &[LinkNode]) -> Markup {
    html! {
        @for section in sections {
            div.index-section {
                h2 { (section.label) }
                @if section.children.iter().all(LinkNode::is_leaf) {
                    (render_tree(&section.children))
                } @else {
                    @for group in &section.children {
                        div.index-group {
                            h3 { (group.label) }
                            (render_tree(&group.children))
                        }
                    }
                }
            }
        }
    }
}

/// Dropdown menu items, one per category.
///
/// Subcategories become headers followed by their articles, with a divider
/// between consecutive subcategories.
pub fn render_menu(categories: &[LinkNode]) -> Markup {
    html! {
        @for (idx, category) in categories.iter().enumerate() {
            @let toggle_id = format!("dropdown-{}", idx + 1);
            li.nav-item.dropdown {
                a.nav-link.dropdown-toggle href="#" id=(toggle_id) role="button"
                    data-bs-toggle="dropdown" aria-expanded="false" { (category.label) }
                ul.dropdown-menu aria-labelledby=(toggle_id) {
                    @for (pos, child) in category.children.iter().enumerate() {
                        @if child.is_leaf() {
                            (menu_item(child))
                        } @else {
                            @if pos > 0 {
                                li { hr.dropdown-divider; }
                            }
                            li { h6.dropdown-header { (child.label) } }
                            @for article in &child.children {
                                (menu_item(article))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn menu_item(node: &LinkNode) -> Markup {
    html! {
        li {
            a.dropdown-item href=[node.href.as_deref()] { (node.label) }
        }
    }
}

/// Default menu generator: the manifest's menu tree as dropdowns.
pub fn menu(manifest: &Manifest) -> Markup {
    render_menu(&menu_tree(manifest))
}

// ============================================================================
// Breadcrumb and article navigation
// ============================================================================

pub fn render_breadcrumb(trail: &[Crumb]) -> Markup {
    html! {
        nav.breadcrumb aria-label="breadcrumb" {
            ol {
                @for crumb in trail {
                    @match &crumb.href {
                        Some(href) => li { a href=(href) { (crumb.label) } },
                        None => li aria-current="page" { (crumb.label) },
                    }
                }
            }
        }
    }
}

/// Previous/next links. An empty slot keeps `next` right-aligned on the
/// first article.
pub fn render_article_nav(nav: &ArticleNav) -> Markup {
    html! {
        div.article-nav {
            @match &nav.previous {
                Some(link) => (nav_link(link, "nav-previous")),
                None => div.nav-slot {},
            }
            @if let Some(link) = &nav.next {
                (nav_link(link, "nav-next"))
            }
        }
    }
}

fn nav_link(link: &NavLink, class: &str) -> Markup {
    html! {
        a class=(class) href=(link.href) {
            span.nav-label { (link.label) }
            small.nav-context { (link.context) }
        }
    }
}
