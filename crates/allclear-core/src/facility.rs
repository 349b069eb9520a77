//! Facility and location types shared by the client, the store, and the views.

use serde::{Deserialize, Deserializer, Serialize};

/// A latitude/longitude pair.
///
/// Captured once per search trigger (device geolocation, map drag/zoom end,
/// autocomplete selection, or the stored profile location). A newer position
/// supersedes the previous one; positions themselves are never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both coordinates are finite and within WGS84 bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Parses `"lat,lng"`, tolerating whitespace around either number.
    ///
    /// Returns `None` for malformed or out-of-range input.
    #[must_use]
    pub fn parse_pair(raw: &str) -> Option<Self> {
        let (lat, lng) = raw.split_once(',')?;
        let position = Self::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?);
        position.is_valid().then_some(position)
    }
}

/// A place chosen from the autocomplete collaborator.
///
/// Also the shape stored (as JSON) in the `search` URL query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSelection {
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub id: String,
}

impl PlaceSelection {
    #[must_use]
    pub fn position(&self) -> GeoPosition {
        GeoPosition::new(self.latitude, self.longitude)
    }

    /// A selection with an empty description is how the autocomplete widget
    /// reports a cleared input; it carries no usable location.
    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// A testing facility as returned by the search backend.
///
/// Records are kept in the order the backend ranked them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRecord {
    /// Backend identifier. Numeric ids are stored as strings.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub drive_thru: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Any other properties the backend sends (appointment requirements,
    /// test types, notes). The list view renders them as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FacilityRecord {
    #[must_use]
    pub fn position(&self) -> GeoPosition {
        GeoPosition::new(self.latitude, self.longitude)
    }

    /// `"City, ST"` as shown under the facility name.
    #[must_use]
    pub fn city_state(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn facility_record_accepts_numeric_id_and_keeps_unknown_fields() {
        let record: FacilityRecord = serde_json::from_value(json!({
            "id": 17,
            "name": "City Clinic",
            "address": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "hours": "9-5",
            "driveThru": true,
            "phone": "555-0100",
            "url": "https://clinic.example",
            "latitude": 39.8,
            "longitude": -89.6,
            "appointmentRequired": false
        }))
        .expect("record should parse");

        assert_eq!(record.id, "17");
        assert!(record.drive_thru);
        assert_eq!(record.city_state(), "Springfield, IL");
        assert_eq!(record.extra.get("appointmentRequired"), Some(&json!(false)));
    }

    #[test]
    fn facility_record_defaults_optional_fields() {
        let record: FacilityRecord = serde_json::from_value(json!({
            "id": "abc",
            "name": "Pop-up Site",
            "latitude": 40.0,
            "longitude": -74.0
        }))
        .expect("record should parse");

        assert_eq!(record.id, "abc");
        assert!(!record.drive_thru);
        assert!(record.phone.is_none());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn parse_pair_rejects_out_of_range() {
        assert_eq!(
            GeoPosition::parse_pair(" 40.71427, -74.00597 "),
            Some(GeoPosition::new(40.714_27, -74.005_97))
        );
        assert!(GeoPosition::parse_pair("91,0").is_none());
        assert!(GeoPosition::parse_pair("40.7").is_none());
        assert!(GeoPosition::parse_pair("a,b").is_none());
    }

    #[test]
    fn blank_place_description_is_a_clear() {
        let place = PlaceSelection {
            description: "  ".to_owned(),
            latitude: 1.0,
            longitude: 2.0,
            id: "p".to_owned(),
        };
        assert!(!place.has_description());
    }
}
