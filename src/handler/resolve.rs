//! Request path resolution
//!
//! Maps a URL path onto the filesystem under the served root. Percent-escapes
//! are decoded before normalization, so encoded `..` segments are caught too.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use relative_path::{Component, RelativePath, RelativePathBuf};
use tokio::fs;

use crate::error::ServeError;
use crate::logger;

/// What a URL path names on disk
#[derive(Debug)]
pub enum Resolved {
    File {
        /// Canonical location, symlinks followed
        path: PathBuf,
        /// Location as named by the request, used for content type
        request_path: PathBuf,
        metadata: Metadata,
    },
    Dir { path: PathBuf },
}

/// Resolve `url_path` against the canonical `root`
///
/// Symlinks are followed as long as their target stays inside `root`.
pub async fn resolve(root: &Path, url_path: &str) -> Result<Resolved, ServeError> {
    let relative = to_relative(url_path)?;
    let fs_path = relative.to_path(root);

    let metadata = fs::metadata(&fs_path)
        .await
        .map_err(|e| ServeError::from_io(&e))?;
    let canonical = fs::canonicalize(&fs_path)
        .await
        .map_err(|e| ServeError::from_io(&e))?;

    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            url_path,
            canonical.display()
        ));
        return Err(ServeError::Forbidden);
    }

    if metadata.is_dir() {
        Ok(Resolved::Dir { path: canonical })
    } else if metadata.is_file() {
        Ok(Resolved::File {
            path: canonical,
            request_path: fs_path,
            metadata,
        })
    } else {
        // sockets, fifos, devices
        Err(ServeError::Forbidden)
    }
}

/// Decode and normalize a URL path into a path relative to the root
fn to_relative(url_path: &str) -> Result<RelativePathBuf, ServeError> {
    let decoded = percent_decode_str(url_path).decode_utf8_lossy();
    if decoded.contains('\0') {
        return Err(ServeError::NotFound);
    }

    let relative = RelativePath::new(decoded.trim_start_matches('/')).normalize();
    for component in relative.components() {
        match component {
            Component::ParentDir => {
                logger::log_warning(&format!("Path traversal attempt blocked: {url_path}"));
                return Err(ServeError::Forbidden);
            }
            Component::Normal(name) if name.contains('\\') => return Err(ServeError::Forbidden),
            _ => {}
        }
    }
    Ok(relative)
}
