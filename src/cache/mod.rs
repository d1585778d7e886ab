//! In-memory cache of rendered sitemap documents.
//!
//! Documents are keyed by name (`index`, `post`, `post:2`, ...) and expire
//! after the configured lifetime. A separate validity flag per key lets the
//! server mark a document stale without dropping it.

mod document;

pub use document::{DocumentCache, document_key};
