//! Request handler module
//!
//! Maps requests onto files under the served root and builds the responses.

pub mod listing;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
