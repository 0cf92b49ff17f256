//! Shared test utilities for the docs-router test suite.
//!
//! Provides a sample manifest, an in-memory fetcher, and extractors that keep
//! assertions readable.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let manifest = sample_manifest();
//! let entries = flatten(&manifest);
//! assert_eq!(flat_pages(&entries)[0], "1.1");
//!
//! let fetcher = sample_site();
//! let body = fetcher.fetch_text("data/articles.json").await.unwrap();
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::breadcrumb::Crumb;
use crate::fetch::{Fetch, FetchError};
use crate::manifest::parse_manifest;
use crate::types::{FlatEntry, Manifest};

// =========================================================================
// Fixtures
// =========================================================================

/// Three categories: direct articles, subcategories (one untitled), and an
/// untitled category.
pub const SAMPLE_MANIFEST: &str = r#"{
    "01_Intro": {
        "title": "Introduction",
        "articles": [
            {"page": "1.1", "title": "Bienvenue"},
            {"page": "1.2", "title": "Installation"}
        ]
    },
    "02_Frontend": {
        "title": "Frontend",
        "subcategories": {
            "01_HTML": {
                "title": "HTML",
                "articles": [
                    {"page": "2.1.1", "title": "Balises"},
                    {"page": "2.1.2", "title": "Formulaires"}
                ]
            },
            "02_CSS": {
                "articles": [
                    {"page": "2.2.1", "title": "Sélecteurs"}
                ]
            }
        }
    },
    "03_Backend": {
        "articles": [
            {"page": "3.1", "title": "Node"}
        ]
    }
}"#;

pub fn sample_manifest() -> Manifest {
    parse_manifest(SAMPLE_MANIFEST).unwrap()
}

/// A site with layout partials, the sample manifest, and a few fragments.
pub fn sample_site() -> MapFetcher {
    MapFetcher::new()
        .with("includes/header.html", r#"<nav><ul class="navbar-nav"></ul></nav>"#)
        .with("includes/footer.html", "<p>pied de page</p>")
        .with("data/articles.json", SAMPLE_MANIFEST)
        .with("content/home.html", "<section><p>Bienvenue sur le site</p></section>")
        .with("content/about.html", "<h1>À propos</h1><p>Qui sommes-nous</p>")
        .with(
            "content/articles/01_Intro/1.1.html",
            "<h1 class=\"title\">Bienvenue</h1><p>Premier article</p>",
        )
        .with("content/articles/01_Intro/1.2.html", "<p>Sans titre</p>")
        .with(
            "content/articles/02_Frontend/01_HTML/2.1.1.html",
            "<h1>Les <em>balises</em></h1>",
        )
}

// =========================================================================
// In-memory fetcher
// =========================================================================

/// Serves a fixed map of paths. Records every request.
///
/// An optional hook runs on each fetch before the body is returned, which
/// lets tests simulate a navigation starting while a request is in flight.
#[derive(Default)]
pub struct MapFetcher {
    files: HashMap<String, String>,
    statuses: HashMap<String, u16>,
    requests: Mutex<Vec<String>>,
    on_fetch: Option<(String, Arc<AtomicU64>)>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), body.to_string());
        self
    }

    pub fn without(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    /// Answer `path` with a non-success status.
    pub fn with_status(mut self, path: &str, status: u16) -> Self {
        self.statuses.insert(path.to_string(), status);
        self
    }

    /// Bump `counter` whenever `path` is fetched.
    pub fn bump_on(mut self, path: &str, counter: Arc<AtomicU64>) -> Self {
        self.on_fetch = Some((path.to_string(), counter));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| *p == path).count()
    }
}

impl Fetch for MapFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(path.to_string());
        tokio::task::yield_now().await;
        if let Some((hook_path, counter)) = &self.on_fetch {
            if hook_path == path {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }
        if let Some(status) = self.statuses.get(path) {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: *status,
            });
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}

// =========================================================================
// Extractors
// =========================================================================

/// Page identifiers in document order.
pub fn flat_pages(entries: &[FlatEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.page.as_str()).collect()
}

/// Breadcrumb labels in trail order.
pub fn crumb_labels(trail: &[Crumb]) -> Vec<&str> {
    trail.iter().map(|c| c.label.as_str()).collect()
}
