//! Map page query-string codec.
//!
//! Two parameters belong to the map page:
//! - `search`: the autocomplete selection as JSON
//!   (`{"description", "latitude", "longitude", "id"}`)
//! - `selection`: the id of the facility expanded in the list
//!
//! Any other parameters are carried through untouched.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::facility::PlaceSelection;

const SEARCH_PARAM: &str = "search";
const SELECTION_PARAM: &str = "selection";

/// Characters left unescaped in query values (RFC 3986 unreserved set).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlQuery {
    pub search: Option<PlaceSelection>,
    pub selection: Option<String>,
    /// Unrelated parameters, still encoded, in their original order.
    pub passthrough: Vec<(String, String)>,
}

impl UrlQuery {
    /// Parses a query string with or without the leading `?`.
    ///
    /// A `search` value that is not valid selection JSON is ignored, as is
    /// an empty `selection`.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                SEARCH_PARAM => {
                    parsed.search = decode(raw_value)
                        .and_then(|json| serde_json::from_str::<PlaceSelection>(&json).ok());
                    if parsed.search.is_none() {
                        tracing::debug!(value = raw_value, "ignoring unparseable search parameter");
                    }
                }
                SELECTION_PARAM => {
                    parsed.selection = decode(raw_value).filter(|s| !s.is_empty());
                }
                _ => parsed
                    .passthrough
                    .push((key.to_owned(), raw_value.to_owned())),
            }
        }

        parsed
    }

    /// Renders the query string without a leading `?`. Map-page parameters
    /// come first, then passthrough parameters.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(search) = &self.search {
            // PlaceSelection holds only strings and floats; serialization
            // cannot fail for finite coordinates.
            if let Ok(json) = serde_json::to_string(search) {
                parts.push(format!("{SEARCH_PARAM}={}", encode(&json)));
            }
        }
        if let Some(selection) = &self.selection {
            parts.push(format!("{SELECTION_PARAM}={}", encode(selection)));
        }
        for (key, value) in &self.passthrough {
            if value.is_empty() {
                parts.push(key.clone());
            } else {
                parts.push(format!("{key}={value}"));
            }
        }
        parts.join("&")
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

fn decode(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(std::borrow::Cow::into_owned)
}
