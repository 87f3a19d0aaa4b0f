//! Error types
//!
//! Per-request failures are turned into HTTP responses where they are detected.
//! Only startup failures leave the process.

use std::fmt;
use std::io;
use std::net::SocketAddr;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http;

/// Failure while resolving or serving a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeError {
    /// Nothing exists at the resolved path
    NotFound,
    /// The path escapes the served root or cannot be read
    Forbidden,
    /// Any method other than GET and HEAD
    MethodNotAllowed,
}

impl ServeError {
    /// Classify a filesystem error hit while resolving a path
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::Forbidden,
            _ => Self::NotFound,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::NotFound => http::build_404_response(),
            Self::Forbidden => http::build_403_response(),
            Self::MethodNotAllowed => http::build_405_response(),
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
            Self::Forbidden => f.write_str("forbidden"),
            Self::MethodNotAllowed => f.write_str("method not allowed"),
        }
    }
}

impl std::error::Error for ServeError {}

/// The listening socket could not be created
#[derive(Debug)]
pub struct BindError {
    pub addr: SocketAddr,
    pub source: io::Error,
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source.kind() {
            io::ErrorKind::AddrInUse => {
                write!(f, "failed to bind {}: address already in use", self.addr)
            }
            io::ErrorKind::PermissionDenied => {
                write!(f, "failed to bind {}: permission denied", self.addr)
            }
            _ => write!(f, "failed to bind {}: {}", self.addr, self.source),
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
