//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

/// Content-Type used when the extension is missing or unknown
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get MIME Content-Type for a file path
///
/// Text documents a browser renders directly are tagged as UTF-8.
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => content_type_for_extension(ext),
        None => DEFAULT_CONTENT_TYPE,
    }
}

fn content_type_for_extension(extension: &str) -> &'static str {
    match mime_guess::from_ext(extension).first_raw() {
        Some("text/html") => "text/html; charset=utf-8",
        Some("text/plain") => "text/plain; charset=utf-8",
        Some(mime) => mime,
        None => DEFAULT_CONTENT_TYPE,
    }
}
