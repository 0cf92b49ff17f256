//! Breadcrumb trail for the current route.
//!
//! ```text
//! Accueil › Frontend › HTML › Formulaires
//!   link      link      link   terminal
//! ```
//!
//! The trail is built even when the manifest could not be loaded: labels
//! then fall back to the raw route keys.

use crate::manifest::{find_article, lookup_title};
use crate::paths::{ENTRY_POINT, build_listing_url};
use crate::types::{Manifest, Route};

/// One step of the trail. The terminal step has no link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub href: Option<String>,
}

impl Crumb {
    fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
        }
    }

    fn terminal(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
        }
    }
}

/// Build the trail for `route`.
///
/// `home_label` heads every trail. Category and subcategory steps link to
/// their listings; the page step is terminal and labelled with the article
/// title when the manifest knows it.
pub fn build_trail(route: &Route, manifest: Option<&Manifest>, home_label: &str) -> Vec<Crumb> {
    let mut trail = vec![Crumb::link(home_label, ENTRY_POINT)];

    if let Some(cat) = route.cat() {
        let label = match manifest {
            Some(m) => lookup_title(m, cat, None, None),
            None => cat.to_string(),
        };
        trail.push(Crumb::link(label, build_listing_url(cat, None)));

        if let Some(subcat) = route.subcat() {
            let label = manifest
                .and_then(|m| m.category(cat))
                .and_then(|c| c.subcategory(subcat))
                .map_or(subcat, |s| s.display_title(subcat));
            trail.push(Crumb::link(label, build_listing_url(cat, Some(subcat))));
        }
    }

    if let Some(page) = route.page() {
        let label = match (manifest, route.cat()) {
            (Some(m), Some(cat)) => find_article(m, cat, route.subcat(), page)
                .map(|a| a.title.clone())
                .unwrap_or_else(|| page.to_string()),
            _ => page.to_string(),
        };
        trail.push(Crumb::terminal(label));
    }

    trail
}
