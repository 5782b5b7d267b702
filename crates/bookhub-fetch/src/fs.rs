//! Resources read from a local site directory.

use async_trait::async_trait;
use bookhub_core::{
    error::BookhubError,
    shellexpand,
    traits::{ResourceSource, Response},
};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Serves files below a root directory, mapping filesystem errors onto
/// HTTP-like statuses.
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: &str) -> Self {
        Self {
            root: PathBuf::from(shellexpand(root)),
        }
    }

    /// Resolve a site-relative path, refusing anything that climbs out of
    /// the root.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches("./").trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl ResourceSource for FsSource {
    fn name(&self) -> &str {
        "fs"
    }

    async fn fetch(&self, path: &str) -> Result<Response, BookhubError> {
        let Some(full) = self.resolve(path) else {
            return Ok(Response {
                path: path.to_string(),
                status: 403,
                body: String::new(),
            });
        };
        debug!("fs: read {}", full.display());

        let status = match tokio::fs::read_to_string(&full).await {
            Ok(body) => return Ok(Response::ok(path, body)),
            Err(e) if e.kind() == ErrorKind::NotFound => 404,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => 403,
            Err(e) => return Err(BookhubError::Io(e)),
        };
        Ok(Response {
            path: path.to_string(),
            status,
            body: String::new(),
        })
    }
}
