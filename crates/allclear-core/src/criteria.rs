//! Search filter criteria and the active-filter calculations built on them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel value meaning "no constraint" for a filter key.
pub const ANY: &str = "Any";

/// User-selected filters keyed by filter name (e.g. `"driveThru"`,
/// `"appointmentRequired"`, `"testTypes"`).
///
/// Changed only through the explicit edit methods below. Keys set to
/// [`ANY`] are kept here (the filter form shows them) but never leave the
/// process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchCriteria(BTreeMap<String, Value>);

impl SearchCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Puts `key` back to [`ANY`].
    pub fn reset(&mut self, key: &str) {
        if let Some(value) = self.0.get_mut(key) {
            *value = Value::String(ANY.to_owned());
        }
    }

    /// Puts every key back to [`ANY`].
    pub fn clear_all(&mut self) {
        for value in self.0.values_mut() {
            *value = Value::String(ANY.to_owned());
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries that actually constrain a search.
    pub fn active(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter().filter(|(_, v)| is_active_value(v))
    }

    /// Number of filters that constrain the search. Drives the badge count.
    #[must_use]
    pub fn count_active(&self) -> usize {
        self.active().count()
    }

    /// The keys of every non-default filter, used to annotate analytics
    /// events.
    #[must_use]
    pub fn diff(&self) -> BTreeSet<String> {
        self.active().map(|(k, _)| k.clone()).collect()
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.active().next().is_some()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for SearchCriteria {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Returns `true` for the sentinel [`ANY`].
#[must_use]
pub fn is_any(value: &Value) -> bool {
    value.as_str() == Some(ANY)
}

/// A value constrains a search unless it is [`ANY`], `null`, `false`, zero,
/// an empty string, or an empty list.
#[must_use]
pub fn is_active_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != ANY,
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}
