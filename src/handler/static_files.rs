//! Static file serving module
//!
//! Handles file loading, directory index lookup, listings, and response building.

use std::fs::Metadata;
use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::listing;
use crate::handler::resolve::{resolve, Resolved};
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;

/// Serve whatever the request path names under the served root
pub async fn serve_path(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match resolve(&state.root, ctx.path).await {
        Ok(Resolved::File {
            path,
            request_path,
            metadata,
        }) => {
            if ctx.path.ends_with('/') {
                return ServeError::NotFound.into_response();
            }
            serve_file(ctx, &path, &request_path, &metadata).await
        }
        Ok(Resolved::Dir { path }) => serve_directory(ctx, state, &path).await,
        Err(e) => e.into_response(),
    }
}

/// Serve a directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        // A leading `//` would make the Location protocol-relative
        let local = ctx.path.trim_start_matches('/');
        let target = match ctx.query {
            Some(query) => format!("/{local}/?{query}"),
            None => format!("/{local}/"),
        };
        return http::build_redirect_response(&target);
    }

    for index_file in &state.config.serve.index_files {
        let index_path = format!("{}{index_file}", ctx.path);
        if let Ok(Resolved::File {
            path,
            request_path,
            metadata,
        }) = resolve(&state.root, &index_path).await
        {
            return serve_file(ctx, &path, &request_path, &metadata).await;
        }
    }

    let entries = match listing::read_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_warning(&format!("Cannot list directory '{}': {e}", dir.display()));
            return e.into_response();
        }
    };
    let display_path = percent_decode_str(ctx.path).decode_utf8_lossy();
    let html = listing::render_listing(&display_path, entries);
    http::build_listing_response(html, ctx.is_head)
}

/// Serve a single regular file
///
/// Bytes are read from `path`; the content type follows `request_path`.
async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    request_path: &Path,
    metadata: &Metadata,
) -> Response<Full<Bytes>> {
    let last_modified = cache::last_modified(metadata);
    if cache::is_not_modified(ctx.if_modified_since.as_deref(), metadata.modified().ok()) {
        return http::build_304_response(last_modified.as_deref());
    }

    let content_type = mime::content_type(request_path);

    if ctx.is_head {
        return http::build_file_response(
            Bytes::new(),
            metadata.len(),
            content_type,
            last_modified.as_deref(),
        );
    }

    match fs::read(path).await {
        Ok(content) => {
            let content_length = content.len() as u64;
            http::build_file_response(
                Bytes::from(content),
                content_length,
                content_type,
                last_modified.as_deref(),
            )
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            ServeError::from_io(&e).into_response()
        }
    }
}
