//! Projections from [`MapState`] to what the map page renders, plus the
//! page-local view state that never enters the shared store: the drawer
//! layout and the URL query.

use std::collections::BTreeSet;
use std::sync::Arc;

use allclear_core::{FacilityRecord, GeoPosition, PlaceSelection, UrlQuery, ViewState};

use crate::state::MapState;

const NO_RESULTS: &str = "No Results Found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Expand,
    Contract,
}

impl ListAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ListAction::Expand => "expand",
            ListAction::Contract => "contract",
        }
    }
}

/// Emitted when a list item is expanded or contracted. Carries the active
/// filter keys at the time of the tap.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItemEvent {
    pub action: ListAction,
    pub item_id: String,
    pub item_index: usize,
    pub item_name: String,
    pub enabled_filters: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    /// 1-based position in the list.
    pub label: usize,
    pub position: GeoPosition,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    Empty { message: &'static str },
    Results(Arc<Vec<FacilityRecord>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterBadge {
    /// The edit-filters button is not shown while a search is loading.
    Hidden,
    /// Button without a count.
    Plain,
    Count(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPrompt {
    pub seq: u64,
    pub position: GeoPosition,
    pub message: String,
}

/// Per-page view synchronization.
///
/// Owns the drawer [`ViewState`] and the URL query for one mounted map page.
/// Everything derived from search results is computed from a fresh
/// [`MapState`] snapshot on each call.
#[derive(Debug, Clone)]
pub struct ViewSync {
    view: ViewState,
    query: UrlQuery,
    did_init: bool,
}

impl ViewSync {
    #[must_use]
    pub fn new(window_width: u32, window_height: u32, query: UrlQuery) -> Self {
        Self {
            view: ViewState::new(window_width, window_height),
            query,
            did_init: false,
        }
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn query(&self) -> &UrlQuery {
        &self.query
    }

    /// The search term from the URL, on the first call only. Later calls
    /// return `None` so a cleared search box is not re-seeded.
    pub fn take_initial_search(&mut self) -> Option<PlaceSelection> {
        if self.did_init {
            return None;
        }
        self.did_init = true;
        self.query.search.clone()
    }

    pub fn set_search(&mut self, place: &PlaceSelection) {
        self.did_init = true;
        self.query.search = Some(place.clone());
    }

    pub fn clear_search(&mut self) {
        self.did_init = true;
        self.query.search = None;
    }

    #[must_use]
    pub fn query_string(&self) -> String {
        self.query.to_query_string()
    }

    pub fn on_resize(&mut self, window_width: u32, window_height: u32) -> bool {
        let changed = self.view.resize(window_width, window_height);
        if changed {
            tracing::debug!(mode = ?self.view.mode(), window_width, "drawer layout changed");
        }
        changed
    }

    pub fn on_toggle(&mut self) -> bool {
        self.view.toggle()
    }

    pub fn on_map_tap(&mut self) -> bool {
        self.view.map_tapped()
    }

    /// Expands `facility_id` in the list, or contracts it if it is already
    /// the expanded one, and mirrors the choice into the `selection` query
    /// parameter.
    ///
    /// Returns `None` if the id is not in the current results.
    pub fn toggle_expanded(
        &mut self,
        state: &MapState,
        facility_id: &str,
    ) -> Option<ListItemEvent> {
        let (index, record) = state
            .locations
            .iter()
            .enumerate()
            .find(|(_, r)| r.id == facility_id)?;

        let action = if self.query.selection.as_deref() == Some(facility_id) {
            self.query.selection = None;
            ListAction::Contract
        } else {
            self.query.selection = Some(facility_id.to_owned());
            ListAction::Expand
        };

        Some(ListItemEvent {
            action,
            item_id: record.id.clone(),
            item_index: index,
            item_name: record.name.clone(),
            enabled_filters: state.search_criteria.diff(),
        })
    }

    #[must_use]
    pub fn markers(state: &MapState) -> Vec<MapMarker> {
        state
            .locations
            .iter()
            .enumerate()
            .map(|(index, record)| MapMarker {
                label: index + 1,
                position: record.position(),
                id: record.id.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn list_view(state: &MapState) -> ListView {
        if state.is_list_loading {
            ListView::Loading
        } else if state.locations.is_empty() {
            ListView::Empty {
                message: NO_RESULTS,
            }
        } else {
            ListView::Results(Arc::clone(&state.locations))
        }
    }

    #[must_use]
    pub fn filter_badge(state: &MapState) -> FilterBadge {
        if state.is_list_loading {
            return FilterBadge::Hidden;
        }
        match state.search_criteria.count_active() {
            0 => FilterBadge::Plain,
            n => FilterBadge::Count(n),
        }
    }

    #[must_use]
    pub fn retry_prompt(state: &MapState) -> Option<RetryPrompt> {
        let failure = state.last_error.as_ref().filter(|f| f.retryable)?;
        Some(RetryPrompt {
            seq: failure.seq,
            position: failure.position,
            message: failure.message.clone(),
        })
    }
}
