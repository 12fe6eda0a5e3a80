//! HTTP-like route handlers. Each takes the query string (GET) or form body
//! (POST) and returns an HTML fragment for HTMX to swap in.

pub mod craft;
pub mod save;
pub mod util;
