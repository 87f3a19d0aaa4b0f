//! Logger module
//!
//! Provides logging utilities for the file server including:
//! - Server lifecycle logging
//! - Access logging in Common Log Format
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

/// Write to info/access log
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

/// Print the startup banner
///
/// The browsable URL always uses `localhost`, whatever interface is bound.
pub fn log_server_start(addr: &SocketAddr, root: &std::path::Path) {
    write_info(&format!("Server running at http://localhost:{}/", addr.port()));
    write_info("Press Ctrl+C to stop the server");
    write_info(&format!("[INFO] Listening on {addr}, serving {}", root.display()));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_access(entry: &AccessLogEntry) {
    write_info(&entry.format_common());
}

pub fn log_shutdown() {
    write_info("\n[SHUTDOWN] Interrupt received, no longer accepting connections");
}
