//! # Docs Router
//!
//! Client-side routing for a documentation site built from HTML fragments.
//! A JSON manifest lists categories, optional subcategories, and articles;
//! each article is a fragment file on disk. Routes are query strings on a
//! single entry page:
//!
//! ```text
//! index.html                                  → content/home.html
//! index.html?page=about                       → content/about.html
//! index.html?cat=01_Intro&page=1.1            → content/articles/01_Intro/1.1.html
//! index.html?cat=02_Frontend&subcat=01_HTML&page=2.1.1
//!                                             → content/articles/02_Frontend/01_HTML/2.1.1.html
//! index.html?cat=02_Frontend                  → listing of the category
//! ```
//!
//! # Architecture: Pure Core, Injected Effects
//!
//! Everything that decides *what* a page shows is a pure function over the
//! manifest and the route: path resolution, breadcrumb trails, prev/next
//! neighbours, listings. The two effects a page load needs are traits the
//! host supplies:
//!
//! - [`fetch::Fetch`] reads fragments, layout partials, and the manifest.
//! - [`surface::Surface`] is the page being written: a few named regions
//!   plus the document title.
//!
//! [`router::Router`] sequences a load over those two. The CLI drives it with
//! a directory on disk and an in-memory [`surface::Document`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Manifest tree, routes, and flattened article entries |
//! | [`paths`] | Route → fragment path, route → URL, query string → route |
//! | [`manifest`] | Parsing, flattening, title lookup, structural checks |
//! | [`breadcrumb`] | Home → category → subcategory → article trail |
//! | [`navigation`] | Previous/next links across the whole manifest |
//! | [`listing`] | Link trees for listings, the sitewide index, and the menu |
//! | [`render`] | Maud markup for everything above |
//! | [`surface`] | Page regions and the in-memory [`surface::Document`] |
//! | [`fetch`] | The fetch capability and its directory-backed implementation |
//! | [`cache`] | Per-navigation manifest memoization |
//! | [`router`] | The page load state machine |
//! | [`config`] | `config.toml` loading, validation, and stock defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Manifest Fetch Per Navigation
//!
//! Menu, breadcrumb, navigation and index all need the manifest. They share
//! one fetch through [`cache::ManifestCache`], keyed by navigation. A new
//! navigation refetches, so an edited manifest shows up on the next load
//! without any invalidation logic.
//!
//! ## Stale Loads Never Write
//!
//! Fetches for an old navigation may finish after a newer one started. Every
//! write to the surface is checked against the current navigation first, so
//! a slow response can never overwrite a newer page.
//!
//! ## Degrade, Don't Fail
//!
//! A broken manifest still leaves the fragment readable: the breadcrumb
//! falls back to raw keys and the prev/next links are omitted. Missing
//! fragments get a not-found message. Nothing in a page load returns an
//! error to the host.
//!
//! ## Maud Over Templates
//!
//! Markup is generated with [Maud](https://maud.lambda.xyz/). Labels and
//! URLs are escaped on interpolation; only fetched fragments are inserted
//! verbatim.

pub mod breadcrumb;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod listing;
pub mod manifest;
pub mod navigation;
pub mod output;
pub mod paths;
pub mod render;
pub mod router;
pub mod surface;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
