//! Injection seam for facility search.
//!
//! The resolver holds an `Arc<dyn FacilitySearch>` built once at startup;
//! tests substitute scripted implementations.

use std::future::Future;
use std::pin::Pin;

use allclear_core::{FacilityRecord, SearchPayload};

use crate::error::ClientError;

/// Boxed, `Send` future returned by [`FacilitySearch`] methods.
pub type SearchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ClientError>> + Send + 'a>>;

pub trait FacilitySearch: Send + Sync {
    /// Runs one search and returns the records in backend rank order.
    ///
    /// One call is one network request: no deduplication and no retry
    /// beyond what the implementation is configured for.
    fn search<'a>(&'a self, payload: &'a SearchPayload) -> SearchFuture<'a, Vec<FacilityRecord>>;
}
