//! Cross-origin header injection

use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use hyper::Response;

/// Set `Access-Control-Allow-Origin: *`, replacing any earlier value.
///
/// Must be the last header mutation applied to a response.
pub fn apply_cors<B>(response: &mut Response<B>) {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}
