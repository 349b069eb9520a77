//! Facility search request body.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::criteria::{is_any, SearchCriteria};
use crate::facility::GeoPosition;

/// Search radius sent with every request.
pub const SEARCH_RADIUS_MILES: u32 = 100;

/// Body key reserved for the search origin.
const ORIGIN_KEY: &str = "from";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchOrigin {
    pub latitude: f64,
    pub longitude: f64,
    pub miles: u32,
}

/// The body of `POST /facilities/search`:
/// `{"from": {latitude, longitude, miles}, ...non-Any criteria}`.
///
/// Built fresh for every search and never modified afterwards, so the fields
/// are only readable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPayload {
    from: SearchOrigin,
    #[serde(flatten)]
    filters: BTreeMap<String, Value>,
}

impl SearchPayload {
    /// Merges `position` and the 100-mile radius with every criteria entry
    /// that is not [`crate::ANY`] or `null`.
    ///
    /// A criteria key named `from` would collide with the origin and is
    /// dropped.
    #[must_use]
    pub fn new(position: GeoPosition, criteria: &SearchCriteria) -> Self {
        let filters = criteria
            .iter()
            .filter(|(key, value)| {
                if key.as_str() == ORIGIN_KEY {
                    tracing::warn!(
                        key = %key,
                        "dropping criteria entry that collides with the search origin"
                    );
                    return false;
                }
                !is_any(value) && !value.is_null()
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            from: Self::origin(position),
            filters,
        }
    }

    /// A payload that ignores every filter.
    #[must_use]
    pub fn unfiltered(position: GeoPosition) -> Self {
        Self {
            from: Self::origin(position),
            filters: BTreeMap::new(),
        }
    }

    fn origin(position: GeoPosition) -> SearchOrigin {
        SearchOrigin {
            latitude: position.latitude,
            longitude: position.longitude,
            miles: SEARCH_RADIUS_MILES,
        }
    }

    #[must_use]
    pub fn origin_position(&self) -> GeoPosition {
        GeoPosition::new(self.from.latitude, self.from.longitude)
    }

    #[must_use]
    pub fn search_origin(&self) -> &SearchOrigin {
        &self.from
    }

    #[must_use]
    pub fn filters(&self) -> &BTreeMap<String, Value> {
        &self.filters
    }

    /// The JSON request body. Construction already excluded `"Any"` values;
    /// senders still run [`strip_inactive_keys`] over it before transmission.
    #[must_use]
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert(ORIGIN_KEY.to_owned(), origin_json(&self.from));
        for (key, value) in &self.filters {
            body.insert(key.clone(), value.clone());
        }
        Value::Object(body)
    }
}

fn origin_json(origin: &SearchOrigin) -> Value {
    serde_json::json!({
        "latitude": origin.latitude,
        "longitude": origin.longitude,
        "miles": origin.miles,
    })
}

/// Removes every top-level key whose value is `"Any"` or `null`.
///
/// Returns the removed keys. Only the shallow key/value set is inspected.
pub fn strip_inactive_keys(body: &mut Map<String, Value>) -> Vec<String> {
    let removed: Vec<String> = body
        .iter()
        .filter(|(_, v)| is_any(v) || v.is_null())
        .map(|(k, _)| k.clone())
        .collect();
    for key in &removed {
        body.remove(key);
    }
    removed
}
