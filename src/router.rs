//! Page router: one page load from route to rendered surface.
//!
//! ## Load Sequence
//!
//! ```text
//! Start → ResolvingRoute → FetchingFragment → Rendered | NotFound
//! ```
//!
//! 1. **Resolve**: classify the route as home (no `cat`, no `page`), page
//!    (`page` set), or listing (`cat` set, no `page`).
//! 2. **Fetch**: the layout partials and the route's content (fragment or
//!    manifest) are fetched concurrently. Nothing is written yet.
//! 3. **Commit**, in order: header, footer, menu, content, breadcrumb,
//!    article navigation, article index. Breadcrumb and navigation are
//!    appended after the fragment is injected, never before.
//!
//! ## Stale Loads
//!
//! Every load takes a [`Ticket`] from the shared [`Navigations`] counter.
//! Starting another load makes older tickets stale, and a stale load stops
//! before its next write to the surface, returning
//! [`PageOutcome::Superseded`]. Fetches already in flight are not aborted;
//! their results are dropped.
//!
//! ## Failure Absorption
//!
//! Nothing here returns an error. A missing region is logged and skipped,
//! a failed fragment fetch renders the not-found message, and a failed
//! manifest fetch degrades the breadcrumb to raw keys and drops the article
//! navigation. An already-injected fragment is never blanked by a later
//! widget failing.

use crate::breadcrumb::build_trail;
use crate::cache::{CacheStats, ManifestCache, ManifestError};
use crate::config::SiteConfig;
use crate::fetch::{Fetch, FetchError};
use crate::listing::{ListingMiss, category_listing, site_index};
use crate::navigation::{Arrows, article_nav};
use crate::paths::resolve_path;
use crate::render::{
    self, MenuGenerator, fragment, message, render_article_nav, render_breadcrumb, render_listing,
    render_site_index,
};
use crate::surface::{Region, Surface};
use crate::types::{HOME_PAGE, Manifest, Route};
use maud::{Markup, html};
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

// ============================================================================
// Navigation generations
// ============================================================================

/// Monotonic navigation counter shared by every load of one router.
#[derive(Debug, Clone, Default)]
pub struct Navigations {
    current: Arc<AtomicU64>,
}

impl Navigations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation, making every earlier ticket stale.
    pub fn begin(&self) -> Ticket {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            generation,
            current: Arc::clone(&self.current),
        }
    }

    /// The raw counter, for callers that start navigations from elsewhere.
    pub fn counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.current)
    }
}

/// Proof of which navigation a piece of work belongs to.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    ResolvingRoute,
    FetchingFragment,
    Rendered,
    NotFound,
}

/// How a page load ended. Carries the document title that was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// A fragment (article, top-level page or home) was injected.
    Rendered { title: String },
    /// A category or subcategory listing was rendered.
    Listing { title: String },
    /// The fragment could not be loaded, or there was nowhere to put it.
    NotFound { title: String },
    /// A newer navigation started before this one committed.
    Superseded,
}

impl PageOutcome {
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Rendered { title } | Self::Listing { title } | Self::NotFound { title } => {
                Some(title.as_str())
            }
            Self::Superseded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteKind {
    Home,
    Page,
    Listing,
}

fn classify(route: &Route) -> RouteKind {
    match (route.cat(), route.page()) {
        (None, None) => RouteKind::Home,
        (_, Some(_)) => RouteKind::Page,
        (Some(_), None) => RouteKind::Listing,
    }
}

enum Fetched {
    Fragment(Result<String, FetchError>),
    Manifest(Result<Arc<Manifest>, ManifestError>),
    /// No content region to render into.
    Skipped,
}

struct Layout {
    header: Option<Result<String, FetchError>>,
    footer: Option<Result<String, FetchError>>,
}

// ============================================================================
// Title derivation
// ============================================================================

static H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1>").expect("valid heading regex"));

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Decode the entities markup escapes text with. `&amp;` goes last so
/// `&amp;lt;` stays `&lt;`.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Text of the first `<h1>` in a fragment, if it has any.
pub fn first_heading(fragment: &str) -> Option<String> {
    let inner = H1.captures(fragment)?.get(1)?.as_str();
    let text = decode_entities(strip_html_tags(inner).trim());
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Document title for a rendered fragment.
///
/// The first `<h1>` wins. Without one, the home page gets the home label and
/// anything else gets its route keys joined with ` / `.
pub fn derive_title(route: &Route, fragment: &str, config: &SiteConfig) -> String {
    if let Some(heading) = first_heading(fragment) {
        return config.document_title(&heading);
    }
    let page = route.page_or_home();
    let label = match (route.cat(), route.subcat()) {
        (None, _) if page == HOME_PAGE => config.labels.home.clone(),
        (Some(cat), Some(subcat)) => format!("{cat} / {subcat} / {page}"),
        (Some(cat), None) => format!("{cat} / {page}"),
        (None, _) => page.to_string(),
    };
    config.document_title(&label)
}

// ============================================================================
// Router
// ============================================================================

pub struct Router<F> {
    fetcher: F,
    config: SiteConfig,
    menu: Option<MenuGenerator>,
    cache: ManifestCache,
    navigations: Navigations,
}

impl<F: Fetch> Router<F> {
    /// A router without a menu generator.
    pub fn new(fetcher: F, config: SiteConfig) -> Self {
        Self {
            fetcher,
            config,
            menu: None,
            cache: ManifestCache::new(),
            navigations: Navigations::new(),
        }
    }

    /// Render the dropdown menu with `generator` after the layout loads.
    pub fn with_menu(mut self, generator: MenuGenerator) -> Self {
        self.menu = Some(generator);
        self
    }

    /// Share a navigation counter with other parts of the host.
    pub fn with_navigations(mut self, navigations: Navigations) -> Self {
        self.navigations = navigations;
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn navigations(&self) -> &Navigations {
        &self.navigations
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Run one complete page load for `route`.
    pub async fn load<S: Surface>(&self, route: &Route, surface: &mut S) -> PageOutcome {
        let ticket = self.navigations.begin();
        debug!(generation = ticket.generation(), phase = ?Phase::Start, ?route, "navigation started");

        debug!(phase = ?Phase::ResolvingRoute, "resolving route");
        let kind = classify(route);
        let has_content = surface.has_region(Region::Content);
        if !has_content {
            warn!(region = %Region::Content, "content region not found");
        }
        let wants_header = self.layout_target(surface, Region::Header, &self.config.layout.header);
        let wants_footer = self.layout_target(surface, Region::Footer, &self.config.layout.footer);

        debug!(phase = ?Phase::FetchingFragment, ?kind, "fetching");
        let (layout, fetched) = tokio::join!(
            self.fetch_layout(wants_header, wants_footer),
            self.fetch_content(route, kind, has_content, &ticket),
        );

        if !self.still_current(&ticket) {
            return PageOutcome::Superseded;
        }
        self.commit_layout(layout, surface);
        self.render_menu(surface, &ticket).await;

        if !self.still_current(&ticket) {
            return PageOutcome::Superseded;
        }
        let outcome = match fetched {
            Fetched::Skipped => {
                let title = self.config.document_title(&self.config.labels.page_not_found_title);
                surface.set_title(&title);
                PageOutcome::NotFound { title }
            }
            Fetched::Fragment(result) => {
                self.commit_fragment(route, kind, result, surface, &ticket)
                    .await
            }
            Fetched::Manifest(result) => self.commit_listing(route, result, surface),
        };

        if kind == RouteKind::Page && self.still_current(&ticket) {
            self.render_article_index(surface, &ticket).await;
        }
        if !self.still_current(&ticket) {
            return PageOutcome::Superseded;
        }
        outcome
    }

    // ------------------------------------------------------------------------
    // Fetch phase
    // ------------------------------------------------------------------------

    fn layout_target<S: Surface>(&self, surface: &S, region: Region, path: &str) -> Option<String> {
        if surface.has_region(region) {
            Some(self.config.site_path(path))
        } else {
            warn!(%region, path, "layout region not found");
            None
        }
    }

    async fn fetch_layout(&self, header: Option<String>, footer: Option<String>) -> Layout {
        let (header, footer) = tokio::join!(self.fetch_optional(header), self.fetch_optional(footer));
        Layout { header, footer }
    }

    async fn fetch_optional(&self, path: Option<String>) -> Option<Result<String, FetchError>> {
        match path {
            Some(path) => Some(self.fetcher.fetch_text(&path).await),
            None => None,
        }
    }

    async fn fetch_content(&self, route: &Route, kind: RouteKind, has_content: bool, ticket: &Ticket) -> Fetched {
        if !has_content {
            return Fetched::Skipped;
        }
        match kind {
            RouteKind::Home | RouteKind::Page => {
                let path = self.config.site_path(&resolve_path(
                    route.cat(),
                    route.subcat(),
                    route.page_or_home(),
                ));
                debug!(%path, "fetching fragment");
                Fetched::Fragment(self.fetcher.fetch_text(&path).await)
            }
            RouteKind::Listing => Fetched::Manifest(self.manifest(ticket).await),
        }
    }

    async fn manifest(&self, ticket: &Ticket) -> Result<Arc<Manifest>, ManifestError> {
        let path = self.config.site_path(&self.config.manifest_path);
        let result = self.cache.load(&self.fetcher, &path, ticket.generation()).await;
        if let Err(e) = &result {
            warn!(%path, error = %e, "manifest unavailable");
        }
        result
    }

    fn still_current(&self, ticket: &Ticket) -> bool {
        let current = ticket.is_current();
        if !current {
            debug!(generation = ticket.generation(), "navigation superseded, dropping results");
        }
        current
    }

    // ------------------------------------------------------------------------
    // Commit phase
    // ------------------------------------------------------------------------

    fn commit_layout<S: Surface>(&self, layout: Layout, surface: &mut S) {
        for (region, result) in [(Region::Header, layout.header), (Region::Footer, layout.footer)] {
            match result {
                Some(Ok(html)) => write(surface, region, fragment(&html), false),
                Some(Err(e)) => warn!(%region, error = %e, "layout partial failed to load"),
                None => {}
            }
        }
    }

    async fn render_menu<S: Surface>(&self, surface: &mut S, ticket: &Ticket) {
        let Some(generator) = self.menu else {
            debug!("no menu generator configured");
            return;
        };
        if !surface.has_region(Region::Menu) {
            warn!(region = %Region::Menu, "menu region not found");
            return;
        }
        if let Ok(manifest) = self.manifest(ticket).await {
            if self.still_current(ticket) {
                write(surface, Region::Menu, generator(&manifest), false);
            }
        }
    }

    async fn commit_fragment<S: Surface>(
        &self,
        route: &Route,
        kind: RouteKind,
        result: Result<String, FetchError>,
        surface: &mut S,
        ticket: &Ticket,
    ) -> PageOutcome {
        let labels = &self.config.labels;
        let html = match result {
            Ok(html) => html,
            Err(e) => {
                warn!(?route, error = %e, "fragment failed to load");
                debug!(phase = ?Phase::NotFound);
                let (text, title) = match kind {
                    RouteKind::Home => (&labels.home_not_found, &labels.home_not_found_title),
                    _ => (&labels.page_not_found, &labels.page_not_found_title),
                };
                write(surface, Region::Content, message(text), false);
                let title = self.config.document_title(title);
                surface.set_title(&title);
                return PageOutcome::NotFound { title };
            }
        };

        write(surface, Region::Content, fragment(&html), false);
        let title = derive_title(route, &html, &self.config);
        surface.set_title(&title);
        debug!(phase = ?Phase::Rendered, %title);

        if kind == RouteKind::Page {
            let manifest = self.manifest(ticket).await.ok();
            if self.still_current(ticket) {
                let trail = build_trail(route, manifest.as_deref(), &labels.home);
                write(surface, Region::Content, render_breadcrumb(&trail), true);

                let arrows = Arrows {
                    previous: &labels.previous,
                    next: &labels.next,
                };
                if let Some(nav) = manifest.and_then(|m| article_nav(route, &m, arrows)) {
                    write(surface, Region::Content, render_article_nav(&nav), true);
                }
            }
        }

        PageOutcome::Rendered { title }
    }

    fn commit_listing<S: Surface>(
        &self,
        route: &Route,
        manifest: Result<Arc<Manifest>, ManifestError>,
        surface: &mut S,
    ) -> PageOutcome {
        let labels = &self.config.labels;
        let Some(cat) = route.cat() else {
            // classify() only produces listings for routes with a category
            return PageOutcome::NotFound {
                title: self.config.document_title(&labels.page_not_found_title),
            };
        };
        let trail = build_trail(route, manifest.as_deref().ok(), &labels.home);

        let (body, heading): (Markup, String) = match &manifest {
            Err(_) => (
                message(&labels.manifest_error),
                route.subcat().unwrap_or(cat).to_string(),
            ),
            Ok(manifest) => match category_listing(manifest, cat, route.subcat()) {
                Ok(listing) => (render_listing(&listing), listing.title),
                Err(miss) => {
                    warn!(error = %miss, "listing target not in manifest");
                    let text = match miss {
                        ListingMiss::UnknownCategory(_) => &labels.category_not_found,
                        ListingMiss::UnknownSubcategory { .. } => &labels.subcategory_not_found,
                    };
                    (message(text), labels.page_not_found_title.clone())
                }
            },
        };

        let content = html! {
            (render_breadcrumb(&trail))
            (body)
        };
        write(surface, Region::Content, content, false);
        let title = self.config.document_title(&heading);
        surface.set_title(&title);
        PageOutcome::Listing { title }
    }

    async fn render_article_index<S: Surface>(&self, surface: &mut S, ticket: &Ticket) {
        if !surface.has_region(Region::ArticleList) {
            return;
        }
        let markup = match self.manifest(ticket).await {
            Ok(manifest) => render_site_index(&site_index(&manifest)),
            Err(_) => message(&self.config.labels.manifest_error),
        };
        if self.still_current(ticket) {
            write(surface, Region::ArticleList, markup, false);
        }
    }
}

/// Write to a region, logging instead of failing when it is missing.
fn write<S: Surface>(surface: &mut S, region: Region, markup: Markup, append: bool) {
    let result = if append {
        surface.append(region, markup)
    } else {
        surface.replace(region, markup)
    };
    if let Err(e) = result {
        warn!(error = %e, "skipping write");
    }
}

/// Router with the stock dropdown menu generator.
pub fn with_default_menu<F: Fetch>(fetcher: F, config: SiteConfig) -> Router<F> {
    Router::new(fetcher, config).with_menu(render::menu)
}
