//! URL handling module for Quote-Harvest
//!
//! This module validates start URLs and resolves pagination links found on a
//! page into absolute URLs.

mod resolve;

pub use resolve::{parse_http_url, resolve_link, same_page};
