//! Per-navigation manifest cache.
//!
//! The menu, breadcrumb, article navigation, listings and sidebar all read
//! `articles.json`. Within one navigation they share a single parsed copy:
//! the first reader fetches and parses, later readers get the same
//! [`Arc<Manifest>`]. The copy is tagged with the generation of the
//! navigation that loaded it, and a read from any other generation discards
//! it and fetches again. Nothing survives from one page load to the next.
//!
//! The slot is guarded by an async mutex held across the fetch, so readers
//! that race on an empty slot wait for the first fetch instead of issuing
//! their own.
//!
//! Failures are not cached. A reader that hits a failed fetch gets the error;
//! the next reader in the same navigation tries again.

use crate::fetch::{Fetch, FetchError};
use crate::manifest::parse_manifest;
use crate::types::Manifest;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("manifest fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Summary of cache effectiveness over the cache's lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub fetches: u32,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} manifest fetches, {} cache hits", self.fetches, self.hits)
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    manifest: Option<Arc<Manifest>>,
    stats: CacheStats,
}

#[derive(Debug, Default)]
pub struct ManifestCache {
    slot: Mutex<Slot>,
}

impl ManifestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the manifest for navigation `generation`, fetching it from `path`
    /// if this generation has not loaded it yet.
    pub async fn load<F: Fetch>(
        &self,
        fetcher: &F,
        path: &str,
        generation: u64,
    ) -> Result<Arc<Manifest>, ManifestError> {
        let mut slot = self.slot.lock().await;
        if slot.generation == generation {
            if let Some(manifest) = &slot.manifest {
                let manifest = Arc::clone(manifest);
                slot.stats.hits += 1;
                return Ok(manifest);
            }
        }

        slot.generation = generation;
        slot.manifest = None;
        slot.stats.fetches += 1;
        let body = fetcher.fetch_text(path).await?;
        let manifest = Arc::new(parse_manifest(&body)?);
        slot.manifest = Some(Arc::clone(&manifest));
        Ok(manifest)
    }

    pub async fn stats(&self) -> CacheStats {
        self.slot.lock().await.stats
    }
}
