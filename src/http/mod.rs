//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from file resolution.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cors::apply_cors;
pub use response::{
    build_304_response, build_403_response, build_404_response, build_405_response,
    build_file_response, build_listing_response, build_redirect_response,
};
