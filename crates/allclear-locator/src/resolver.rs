//! Turns location triggers into searches.
//!
//! Every trigger (device location, map drag/zoom end, autocomplete
//! selection, profile location) resolves to exactly one [`GeoPosition`],
//! which is combined with the current criteria into a fresh
//! [`SearchPayload`] and dispatched. Results flow back through the
//! [`MapStore`] sequence gate.
//!
//! Dispatch spawns onto the current Tokio runtime; call these methods from
//! within one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use allclear_client::FacilitySearch;
use allclear_core::{AppConfig, GeoPosition, PlaceSelection, SearchCriteria, SearchPayload};
use tokio::task::JoinHandle;

use crate::geolocation::{GeolocationOutcome, GeolocationSource};
use crate::state::SearchTicket;
use crate::store::MapStore;
use crate::viewport::MapViewport;

#[derive(Debug, Clone, Copy)]
pub struct ResolverOptions {
    /// Trailing-edge debounce for map idle events. Zero dispatches each one.
    pub map_idle_debounce: Duration,
    /// Abort the previous in-flight search when a new one is dispatched.
    /// Stale responses are discarded by the store either way.
    pub cancel_superseded: bool,
    pub default_center: GeoPosition,
}

impl ResolverOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            map_idle_debounce: Duration::from_millis(config.map_idle_debounce_ms),
            cancel_superseded: config.cancel_superseded,
            default_center: config.default_center,
        }
    }
}

/// How the map settled after mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MountOutcome {
    /// Device location accepted; centered and searched there.
    DeviceLocation(GeoPosition),
    /// Device location declined; the profile location was used.
    ProfileLocation(GeoPosition),
    /// Device location declined and no profile location; nothing searched.
    DefaultCenter(GeoPosition),
}

/// Cloneable handle; clones share the in-flight bookkeeping.
#[derive(Clone)]
pub struct LocationResolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    search: Arc<dyn FacilitySearch>,
    store: MapStore,
    viewport: Arc<dyn MapViewport>,
    options: ResolverOptions,
    inflight: Mutex<Option<JoinHandle<()>>>,
    pending_idle: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LocationResolver {
    #[must_use]
    pub fn new(
        search: Arc<dyn FacilitySearch>,
        store: MapStore,
        viewport: Arc<dyn MapViewport>,
        options: ResolverOptions,
    ) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                search,
                store,
                viewport,
                options,
                inflight: Mutex::new(None),
                pending_idle: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &MapStore {
        &self.inner.store
    }

    /// Page mount: search at the profile location if one is stored, then
    /// request the device location once.
    pub async fn on_mount(&self, geolocation: &dyn GeolocationSource) -> MountOutcome {
        let person = self.inner.store.snapshot().person;
        if let Some(position) = person {
            self.on_position_accepted(position);
        }

        match geolocation.current_position().await {
            GeolocationOutcome::Accepted(position) => {
                self.on_position_accepted(position);
                MountOutcome::DeviceLocation(position)
            }
            GeolocationOutcome::Declined => {
                tracing::warn!("user declined to share device location");
                match person {
                    Some(position) => MountOutcome::ProfileLocation(position),
                    None => MountOutcome::DefaultCenter(self.inner.options.default_center),
                }
            }
        }
    }

    /// Centers the map on `position` and searches there. The pan and the
    /// search are independent: a failed pan is logged and the search still
    /// goes out.
    pub fn on_position_accepted(&self, position: GeoPosition) -> SearchTicket {
        if let Err(err) = self.inner.viewport.pan_to(position) {
            tracing::warn!(
                latitude = position.latitude,
                longitude = position.longitude,
                error = %err,
                "failed to pan map"
            );
        }
        self.search_at(position)
    }

    /// Drag end and zoom-animation end both land here. The search goes out
    /// at the viewport's center as of dispatch.
    ///
    /// With a non-zero debounce only the last event of a burst searches, at
    /// the center read when the timer fires.
    pub fn on_map_idle(&self) {
        let debounce = self.inner.options.map_idle_debounce;
        if debounce.is_zero() {
            self.search_at(self.inner.viewport.center());
            return;
        }

        let this = self.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            this.search_at(this.inner.viewport.center());
        });
        if let Some(previous) = lock(&self.inner.pending_idle).replace(timer) {
            previous.abort();
        }
    }

    /// Autocomplete selection. A selection without a description is the
    /// widget's way of reporting a cleared field and is ignored.
    pub fn on_place_selected(&self, place: &PlaceSelection) -> Option<SearchTicket> {
        if !place.has_description() {
            return None;
        }
        Some(self.on_position_accepted(place.position()))
    }

    /// Autocomplete cleared: fall back to the profile location if there is
    /// one.
    pub fn on_place_cleared(&self) -> Option<SearchTicket> {
        let person = self.inner.store.snapshot().person?;
        Some(self.on_position_accepted(person))
    }

    /// Replaces the criteria and re-runs the search at the current results
    /// center, if there is one.
    pub fn apply_criteria(&self, criteria: SearchCriteria) -> Option<SearchTicket> {
        self.inner.store.set_criteria(criteria);
        self.refresh()
    }

    /// Re-runs the search at the current results center.
    pub fn refresh(&self) -> Option<SearchTicket> {
        let center = self.inner.store.snapshot().center?;
        Some(self.search_at(center))
    }

    /// Re-issues the last failed search, if it failed transiently.
    pub fn retry_last_failure(&self) -> Option<SearchTicket> {
        let state = self.inner.store.snapshot();
        let failure = state.last_error.as_ref().filter(|f| f.retryable)?;
        tracing::info!(seq = failure.seq, "retrying failed search");
        Some(self.search_at(failure.position))
    }

    /// Searches at `position` with the current criteria.
    pub fn search_at(&self, position: GeoPosition) -> SearchTicket {
        let criteria = self.inner.store.snapshot().search_criteria.clone();
        self.dispatch(SearchPayload::new(position, &criteria))
    }

    /// Searches at `position` ignoring every filter.
    pub fn search_unfiltered(&self, position: GeoPosition) -> SearchTicket {
        self.dispatch(SearchPayload::unfiltered(position))
    }

    fn dispatch(&self, payload: SearchPayload) -> SearchTicket {
        let store = self.inner.store.clone();
        let search = Arc::clone(&self.inner.search);

        // Sequence allocation and the in-flight swap happen under one lock so
        // the handle left in `inflight` always belongs to the newest ticket.
        let mut inflight = lock(&self.inner.inflight);
        let ticket = store.begin_search(payload.origin_position());
        let task = tokio::spawn(async move {
            match search.search(&payload).await {
                Ok(records) => {
                    store.apply_results(ticket, records);
                }
                Err(err) => {
                    tracing::warn!(seq = ticket.seq, error = %err, "facility search failed");
                    store.apply_failure(ticket, &err);
                }
            }
        });

        if let Some(previous) = inflight.replace(task) {
            if self.inner.options.cancel_superseded {
                previous.abort();
            }
        }
        ticket
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
