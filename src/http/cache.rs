//! HTTP cache validation module
//!
//! Provides `Last-Modified` generation and `If-Modified-Since` handling.

use std::fs::Metadata;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Format a file's modification time as an IMF-fixdate
pub fn last_modified(metadata: &Metadata) -> Option<String> {
    metadata.modified().ok().map(httpdate::fmt_http_date)
}

/// Check whether the client's cached copy is still current
///
/// HTTP dates carry whole seconds, so the modification time is truncated
/// before comparing. A header that does not parse is ignored.
pub fn is_not_modified(if_modified_since: Option<&str>, modified: Option<SystemTime>) -> bool {
    let (Some(header), Some(modified)) = (if_modified_since, modified) else {
        return false;
    };
    let Ok(since) = httpdate::parse_http_date(header.trim()) else {
        return false;
    };
    truncate_to_seconds(modified) <= since
}

fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => UNIX_EPOCH + Duration::from_secs(elapsed.as_secs()),
        Err(_) => time,
    }
}
