//! The fetch capability the router reads fragments and the manifest through.
//!
//! In a browser this is HTTP; for the CLI and tests it is a directory on
//! disk ([`DirFetcher`]). Either way, a non-success response must surface as
//! an error: callers never inspect bodies of failed requests.

use std::future::Future;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request for {path} failed with status {status}")]
    Status { path: String, status: u16 },
    #[error("path escapes the site root: {0}")]
    InvalidPath(String),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Read access to site files by relative path.
pub trait Fetch {
    /// Fetch a text body. Non-success outcomes are errors.
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Serves files from a site directory.
///
/// Paths are resolved relative to the root; a leading `/` is ignored and
/// `..` components are rejected.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl Fetch for DirFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let full = self.locate(path)?;
        match tokio::fs::read_to_string(&full).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(source) => Err(FetchError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }
}
