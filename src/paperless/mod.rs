//! Paperless-ngx repository client.
//!
//! Typed async wrapper over the Paperless-ngx REST API. The client is
//! stateless and shared read-only by all sessions; it carries no retry
//! policy, circuit breaker, or cache.

mod client;
pub mod models;

pub use client::PaperlessClient;
pub use models::{
    BulkUpdateItem, BulkUpdateOutcome, Document, DocumentOrdering, DocumentUpdate, FailedUpdate,
    Page, SearchParams,
};
