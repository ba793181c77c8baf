use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ScrollReelError, ScrollReelResult};

/// Source of encoded frame bytes, addressed by resource URL.
///
/// Implementations are called concurrently from loader worker threads.
pub trait FrameFetcher: Send + Sync {
    /// Fetch the encoded bytes behind `url`.
    fn fetch(&self, url: &str) -> ScrollReelResult<Vec<u8>>;
}

/// Serves site-root URLs (`/assets/...`) from a directory on disk.
#[derive(Clone, Debug)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    /// Serve URLs relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory URLs are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path a URL resolves to.
    pub fn resolve(&self, url: &str) -> ScrollReelResult<PathBuf> {
        let rel = normalize_url_path(url)?;
        Ok(self.root.join(Path::new(&rel)))
    }
}

impl FrameFetcher for DirFetcher {
    fn fetch(&self, url: &str) -> ScrollReelResult<Vec<u8>> {
        let path = self.resolve(url)?;
        std::fs::read(&path)
            .with_context(|| format!("read frame bytes from '{}'", path.display()))
            .map_err(ScrollReelError::from)
    }
}

/// Normalize a site-root URL path into a relative file path.
///
/// A single leading `/` is the site root. Backslashes are treated as separators, `.` segments
/// are dropped and `..` is rejected.
pub fn normalize_url_path(url: &str) -> ScrollReelResult<String> {
    let s = url.replace('\\', "/");
    let s = s.strip_prefix('/').unwrap_or(&s);
    if s.is_empty() {
        return Err(ScrollReelError::validation("frame url must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ScrollReelError::validation(
                "frame urls must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ScrollReelError::validation(
            "frame url must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
