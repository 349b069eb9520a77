//! Shared map state store.
//!
//! A single `watch` channel holds the current [`MapState`]. The only mutation
//! is a whole-state replace; every helper here derives the next state from
//! the current one and swaps it in atomically.
//!
//! Search results are gated by sequence number. Each search takes the next
//! number from a monotonic counter when it is issued, and a response is
//! applied only if its number is at least the last applied one. A slow
//! response to an older search can therefore never overwrite a newer one,
//! whatever order the responses arrive in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use allclear_client::ClientError;
use allclear_core::{FacilityRecord, GeoPosition, SearchCriteria};
use tokio::sync::watch;

use crate::state::{MapState, SearchFailure, SearchTicket};

/// Cloneable handle to the shared map state. Construct once per session and
/// hand clones to each consumer.
#[derive(Clone)]
pub struct MapStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    tx: watch::Sender<Arc<MapState>>,
    /// Highest sequence number issued so far.
    issued: AtomicU64,
}

impl Default for MapStore {
    fn default() -> Self {
        Self::new(MapState::default())
    }
}

impl MapStore {
    #[must_use]
    pub fn new(initial: MapState) -> Self {
        let issued = AtomicU64::new(initial.applied_seq);
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self {
            inner: Arc::new(StoreInner { tx, issued }),
        }
    }

    /// The current state. Consumers re-read on every render instead of
    /// holding on to an older snapshot across updates.
    #[must_use]
    pub fn snapshot(&self) -> Arc<MapState> {
        Arc::clone(&self.inner.tx.borrow())
    }

    /// A receiver notified after every replace.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<MapState>> {
        self.inner.tx.subscribe()
    }

    /// Replaces the whole state.
    ///
    /// Search bookkeeping (`applied_seq`, `is_list_loading`) is taken from
    /// `state` as given; prefer the search helpers below for search results.
    pub fn replace(&self, state: MapState) {
        self.inner.tx.send_replace(Arc::new(state));
    }

    /// Derives the next state from the current one and replaces it, unless
    /// `next` returns `None`. Returns whether a replace happened.
    fn replace_with<F>(&self, next: F) -> bool
    where
        F: FnOnce(&MapState) -> Option<MapState>,
    {
        self.inner.tx.send_if_modified(|current| match next(&**current) {
            Some(state) => {
                *current = Arc::new(state);
                true
            }
            None => false,
        })
    }

    /// Highest sequence number issued so far.
    #[must_use]
    pub fn latest_issued(&self) -> u64 {
        self.inner.issued.load(Ordering::SeqCst)
    }

    /// Allocates the next sequence number and marks the list as loading.
    ///
    /// Call immediately before sending the request.
    pub fn begin_search(&self, position: GeoPosition) -> SearchTicket {
        let seq = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.replace_with(|current| {
            Some(MapState {
                is_list_loading: true,
                ..current.clone()
            })
        });
        tracing::debug!(
            seq,
            latitude = position.latitude,
            longitude = position.longitude,
            "search issued"
        );
        SearchTicket { seq, position }
    }

    /// Applies the results of the search identified by `ticket`.
    ///
    /// Returns `false` (and leaves the state untouched) when a newer search
    /// has already been applied.
    pub fn apply_results(&self, ticket: SearchTicket, records: Vec<FacilityRecord>) -> bool {
        let issued = &self.inner.issued;
        let applied = self.replace_with(|current| {
            if ticket.seq < current.applied_seq {
                return None;
            }
            Some(MapState {
                locations: Arc::new(records),
                center: Some(ticket.position),
                applied_seq: ticket.seq,
                is_list_loading: ticket.seq < issued.load(Ordering::SeqCst),
                last_error: None,
                ..current.clone()
            })
        });
        if applied {
            tracing::debug!(seq = ticket.seq, "search results applied");
        } else {
            tracing::debug!(seq = ticket.seq, "discarding stale search results");
        }
        applied
    }

    /// Records a failed search: prior locations stay in place, loading is
    /// cleared, and a [`SearchFailure`] is exposed for a retry affordance.
    ///
    /// Returns `false` when a newer search has already been applied.
    pub fn apply_failure(&self, ticket: SearchTicket, err: &ClientError) -> bool {
        let issued = &self.inner.issued;
        let applied = self.replace_with(|current| {
            if ticket.seq < current.applied_seq {
                return None;
            }
            Some(MapState {
                applied_seq: ticket.seq,
                is_list_loading: ticket.seq < issued.load(Ordering::SeqCst),
                last_error: Some(SearchFailure::new(ticket, err)),
                ..current.clone()
            })
        });
        if !applied {
            tracing::debug!(seq = ticket.seq, "discarding stale search failure");
        }
        applied
    }

    /// Replaces the search criteria. Does not issue a search.
    pub fn set_criteria(&self, criteria: SearchCriteria) {
        self.replace_with(|current| {
            Some(MapState {
                search_criteria: criteria,
                ..current.clone()
            })
        });
    }

    /// Applies one filter edit to a copy of the current criteria.
    pub fn edit_criteria<F>(&self, edit: F)
    where
        F: FnOnce(&mut SearchCriteria),
    {
        self.replace_with(|current| {
            let mut criteria = current.search_criteria.clone();
            edit(&mut criteria);
            Some(MapState {
                search_criteria: criteria,
                ..current.clone()
            })
        });
    }

    pub fn set_person(&self, person: Option<GeoPosition>) {
        self.replace_with(|current| {
            Some(MapState {
                person,
                ..current.clone()
            })
        });
    }

    /// Waits until no search is loading and returns that state.
    pub async fn wait_until_settled(&self) -> Arc<MapState> {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|state| !state.is_list_loading).await {
            Ok(state) => Arc::clone(&state),
            // The sender lives as long as `self`; this arm is unreachable in
            // practice.
            Err(_) => self.snapshot(),
        };
        settled
    }
}
