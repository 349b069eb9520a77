//! HTTP client for the facility search backend.

pub mod client;
pub mod error;
mod retry;
pub mod search;

pub use client::FacilityClient;
pub use error::ClientError;
pub use search::{FacilitySearch, SearchFuture};
