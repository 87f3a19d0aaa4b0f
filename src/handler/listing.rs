//! Directory listing generation

use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::fs;

use crate::error::ServeError;

/// Characters left unescaped in listing hrefs
const HREF: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    fn link_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Read the entries of `dir`
///
/// A symlink counts as a directory when its target is one.
pub async fn read_entries(dir: &Path) -> Result<Vec<ListingEntry>, ServeError> {
    let mut read_dir = fs::read_dir(dir)
        .await
        .map_err(|e| ServeError::from_io(&e))?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| ServeError::from_io(&e))?
    {
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|file_type| file_type.is_symlink());
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|metadata| metadata.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }
    Ok(entries)
}

/// Render an HTML listing for the directory shown at `display_path`
///
/// Entries are sorted case-insensitively.
pub fn render_listing(display_path: &str, mut entries: Vec<ListingEntry>) -> String {
    entries.sort_by_cached_key(|entry| entry.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(&entry.link_name(), HREF),
            escape_html(&entry.display_name())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape text for use in HTML content and attribute values
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_sorted_case_insensitively() {
        let html = render_listing(
            "/",
            vec![
                entry("beta.txt", false, false),
                entry("Alpha", true, false),
                entry("gamma.css", false, false),
            ],
        );
        let alpha = html.find("Alpha/").unwrap();
        let beta = html.find("beta.txt").unwrap();
        let gamma = html.find("gamma.css").unwrap();
        assert!(alpha < beta && beta < gamma);
    }

    #[test]
    fn test_entry_decorations() {
        let html = render_listing(
            "/sub/",
            vec![
                entry("assets", true, false),
                entry("latest", true, true),
                entry("notes.md", false, false),
            ],
        );
        assert!(html.contains("<title>Directory listing for /sub/</title>"));
        assert!(html.contains("<li><a href=\"assets/\">assets/</a></li>"));
        assert!(html.contains("<li><a href=\"latest/\">latest@</a></li>"));
        assert!(html.contains("<li><a href=\"notes.md\">notes.md</a></li>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let html = render_listing(
            "/<script>/",
            vec![entry("a b&<c>.txt", false, false)],
        );
        assert!(html.contains("Directory listing for /&lt;script&gt;/"));
        assert!(html.contains("href=\"a%20b%26%3Cc%3E.txt\""));
        assert!(html.contains(">a b&amp;&lt;c&gt;.txt</a>"));
    }

    #[tokio::test]
    async fn test_read_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let mut entries = read_entries(dir.path()).await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            entries,
            vec![entry("file.txt", false, false), entry("nested", true, false)]
        );
    }

    #[tokio::test]
    async fn test_read_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert_eq!(
            read_entries(&missing).await.unwrap_err(),
            ServeError::NotFound
        );
    }
}
