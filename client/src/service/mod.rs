//! Query service abstraction
//!
//! This module provides a trait-based abstraction over the two result
//! endpoints so the controller can be driven by fakes in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::ResultSet;

mod http;

pub use http::HttpQueryService;

/// Trait for query backends
///
/// The empty query never reaches a backend: the controller routes it to
/// `fetch_prototypical` instead of sending an empty `search` parameter.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Fetch the prototypical articles across all topics
    async fn fetch_prototypical(&self) -> Result<ResultSet>;

    /// Fetch the prototypical articles for a user query
    async fn fetch_search(&self, query: &str) -> Result<ResultSet>;
}
