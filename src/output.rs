//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every article is shown by its semantic identity first (reading-order
//! index, page id, title), with the fragment path as an indented `Source:`
//! line. Category and subcategory titles head the groups they contain.
//!
//! # Output Format
//!
//! ## Order
//!
//! ```text
//! Introduction
//!     001 1.1 Bienvenue
//!         Source: content/articles/01_Intro/1.1.html
//!     002 1.2 Installation
//!         Source: content/articles/01_Intro/1.2.html
//! Frontend
//!     HTML
//!         003 2.1.1 Balises
//!             Source: content/articles/02_Frontend/01_HTML/2.1.1.html
//! ```
//!
//! The index is the position in prev/next order, which runs across
//! category boundaries.
//!
//! ## Resolve
//!
//! ```text
//! Page cat=01_Intro page=1.1
//!     Source: content/articles/01_Intro/1.1.html
//!     Breadcrumb: Accueil › Introduction › Bienvenue
//!     Previous: (none)
//!     Next: Installation → index.html?cat=01_Intro&page=1.2
//! ```
//!
//! ## Check
//!
//! ```text
//! 2 issues
//!     category '03_Backend' has neither subcategories nor articles
//!     missing fragment content/articles/01_Intro/1.3.html
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::breadcrumb::build_trail;
use crate::cache::CacheStats;
use crate::config::SiteConfig;
use crate::listing::category_listing;
use crate::manifest::{ManifestIssue, flatten, lookup_title};
use crate::navigation::{Arrows, NavLink, article_nav};
use crate::paths::resolve_path;
use crate::router::PageOutcome;
use crate::types::{Manifest, Route};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Route in query-string order, without the `index.html?` prefix.
fn route_label(route: &Route) -> String {
    let mut parts = Vec::new();
    if let Some(cat) = route.cat() {
        parts.push(format!("cat={cat}"));
    }
    if let Some(subcat) = route.subcat() {
        parts.push(format!("subcat={subcat}"));
    }
    if let Some(page) = route.page() {
        parts.push(format!("page={page}"));
    }
    parts.join(" ")
}

/// Links are built with blank arrows, so the label is just the title.
fn nav_line(label: &str, link: Option<&NavLink>) -> String {
    match link {
        Some(link) => format!("    {}: {} → {}", label, link.label.trim(), link.href),
        None => format!("    {}: (none)", label),
    }
}

// ============================================================================
// Order
// ============================================================================

/// Every article in reading order, grouped under its category and
/// subcategory titles.
pub fn format_order_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_cat: Option<&str> = None;
    let mut current_subcat: Option<&str> = None;

    let entries = flatten(manifest);
    for (i, entry) in entries.iter().enumerate() {
        if current_cat != Some(entry.cat.as_str()) {
            lines.push(lookup_title(manifest, &entry.cat, None, None));
            current_cat = Some(&entry.cat);
            current_subcat = None;
        }
        let depth = match entry.subcat.as_deref() {
            Some(subcat) => {
                if current_subcat != Some(subcat) {
                    lines.push(format!(
                        "{}{}",
                        indent(1),
                        lookup_title(manifest, &entry.cat, Some(subcat), None)
                    ));
                    current_subcat = Some(subcat);
                }
                2
            }
            None => 1,
        };
        lines.push(format!(
            "{}{} {} {}",
            indent(depth),
            format_index(i + 1),
            entry.page,
            entry.title
        ));
        lines.push(format!(
            "{}Source: {}",
            indent(depth + 1),
            resolve_path(Some(&entry.cat), entry.subcat.as_deref(), &entry.page)
        ));
    }

    lines
}

pub fn print_order_output(manifest: &Manifest) {
    for line in format_order_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolve
// ============================================================================

/// What a route resolves to: its fragment or listing, breadcrumb, and
/// neighbours. Without a manifest the breadcrumb uses raw keys.
pub fn format_resolve_output(route: &Route, manifest: Option<&Manifest>, config: &SiteConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let labels = &config.labels;

    match (route.cat(), route.page()) {
        (Some(cat), None) => {
            lines.push(format!("Listing {}", route_label(route)));
            match manifest.map(|m| category_listing(m, cat, route.subcat())) {
                Some(Ok(listing)) => {
                    let count: usize = listing.nodes.iter().map(|n| n.leaf_count()).sum();
                    lines.push(format!("    Title: {}", listing.title));
                    lines.push(format!("    Articles: {}", count));
                }
                Some(Err(miss)) => lines.push(format!("    Not found: {}", miss)),
                None => lines.push("    Manifest unavailable".to_string()),
            }
        }
        _ => {
            if route.is_home() {
                lines.push("Home".to_string());
            } else {
                lines.push(format!("Page {}", route_label(route)));
            }
            lines.push(format!(
                "    Source: {}",
                config.site_path(&resolve_path(route.cat(), route.subcat(), route.page_or_home()))
            ));
        }
    }

    if route.is_home() {
        return lines;
    }

    let trail = build_trail(route, manifest, &labels.home);
    let crumbs: Vec<&str> = trail.iter().map(|c| c.label.as_str()).collect();
    lines.push(format!("    Breadcrumb: {}", crumbs.join(" › ")));

    if route.page().is_some() {
        let arrows = Arrows {
            previous: "",
            next: "",
        };
        match manifest.and_then(|m| article_nav(route, m, arrows)) {
            Some(nav) => {
                lines.push(nav_line("Previous", nav.previous.as_ref()));
                lines.push(nav_line("Next", nav.next.as_ref()));
            }
            None => lines.push("    Navigation: (not in manifest)".to_string()),
        }
    }

    lines
}

pub fn print_resolve_output(route: &Route, manifest: Option<&Manifest>, config: &SiteConfig) {
    for line in format_resolve_output(route, manifest, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Render
// ============================================================================

/// Summary of a rendered page, one line plus cache activity.
pub fn format_render_output(outcome: &PageOutcome, destination: Option<&Path>, stats: CacheStats) -> Vec<String> {
    let (kind, title) = match outcome {
        PageOutcome::Rendered { title } => ("Rendered", title.as_str()),
        PageOutcome::Listing { title } => ("Listing", title.as_str()),
        PageOutcome::NotFound { title } => ("Not found", title.as_str()),
        PageOutcome::Superseded => return vec!["Superseded by a newer navigation".to_string()],
    };
    let target = match destination {
        Some(path) => path.display().to_string(),
        None => "stdout".to_string(),
    };
    vec![
        format!("{}: {} → {}", kind, title, target),
        format!("Manifest: {}", stats),
    ]
}

/// Render summaries go to stderr so the page itself can go to stdout.
pub fn print_render_output(outcome: &PageOutcome, destination: Option<&Path>, stats: CacheStats) {
    for line in format_render_output(outcome, destination, stats) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(manifest: &Manifest, issues: &[ManifestIssue]) -> Vec<String> {
    if issues.is_empty() {
        let articles = flatten(manifest).len();
        return vec![format!(
            "Manifest OK ({} categories, {} articles)",
            manifest.categories.len(),
            articles
        )];
    }

    let mut lines = vec![match issues.len() {
        1 => "1 issue".to_string(),
        n => format!("{} issues", n),
    }];
    lines.extend(issues.iter().map(|issue| format!("{}{}", indent(1), issue)));
    lines
}

pub fn print_check_output(manifest: &Manifest, issues: &[ManifestIssue]) {
    for line in format_check_output(manifest, issues) {
        println!("{}", line);
    }
}
