use std::sync::Arc;

use allclear_client::ClientError;
use allclear_core::{FacilityRecord, GeoPosition, SearchCriteria};
use chrono::{DateTime, Utc};

/// The shared map page state.
///
/// Every change produces a new `MapState` that replaces the previous one as
/// a whole; readers always see a consistent set of fields.
#[derive(Debug, Clone, Default)]
pub struct MapState {
    /// Facilities from the most recently applied search, in backend order.
    pub locations: Arc<Vec<FacilityRecord>>,
    pub is_list_loading: bool,
    pub search_criteria: SearchCriteria,
    /// Location stored on the user's profile, if any.
    pub person: Option<GeoPosition>,
    /// Origin of the search that produced `locations`.
    pub center: Option<GeoPosition>,
    /// Sequence number of the last search applied (results or failure).
    pub applied_seq: u64,
    pub last_error: Option<SearchFailure>,
}

/// Identifies one issued search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTicket {
    pub seq: u64,
    pub position: GeoPosition,
}

/// A search that failed after the previous results were kept on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFailure {
    pub seq: u64,
    pub position: GeoPosition,
    pub message: String,
    /// Whether re-issuing the search could succeed.
    pub retryable: bool,
    pub failed_at: DateTime<Utc>,
}

impl SearchFailure {
    #[must_use]
    pub fn new(ticket: SearchTicket, err: &ClientError) -> Self {
        Self {
            seq: ticket.seq,
            position: ticket.position,
            message: err.to_string(),
            retryable: err.is_transient(),
            failed_at: Utc::now(),
        }
    }
}
