//! Request dispatch module
//!
//! Entry point for HTTP request processing: root rewrite, method validation,
//! file serving, and the final header pass every response goes through.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, SERVER};
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// URL path after the root rewrite, still percent-encoded
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    /// Ignored when the client also sent `If-None-Match`
    pub if_modified_since: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let uri = req.uri();
    let path = rewrite_root(uri.path(), &state.config.serve.root_document);

    let mut response = match check_http_method(method) {
        Err(e) => e.into_response(),
        Ok(()) => {
            let ctx = RequestContext {
                path,
                query: uri.query(),
                is_head: *method == Method::HEAD,
                if_modified_since: if req.headers().contains_key(IF_NONE_MATCH) {
                    None
                } else {
                    req.headers()
                        .get(IF_MODIFIED_SINCE)
                        .and_then(|v| v.to_str().ok())
                        .map(ToString::to_string)
                },
            };
            static_files::serve_path(&ctx, &state).await
        }
    };

    finalize_response(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = format_version(req.version());
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().filter(|n| *n > 0);
        logger::log_access(&entry);
    }

    Ok(response)
}

/// Substitute the root document for requests to exactly `/`
fn rewrite_root<'a>(path: &'a str, root_document: &'a str) -> &'a str {
    if path == "/" {
        root_document
    } else {
        path
    }
}

/// Only GET and HEAD are served
fn check_http_method(method: &Method) -> Result<(), ServeError> {
    match *method {
        Method::GET | Method::HEAD => Ok(()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Err(ServeError::MethodNotAllowed)
        }
    }
}

/// Last step before a response leaves the handler
///
/// The cross-origin header is applied after everything else so no other
/// step can override it.
fn finalize_response(response: &mut Response<Full<Bytes>>, server_name: &str) {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        response.headers_mut().insert(SERVER, value);
    }
    http::apply_cors(response);
}

fn format_version(version: hyper::Version) -> String {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string()
}
