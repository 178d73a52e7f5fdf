use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// String-keyed map that remembers insertion order.
///
/// Breakdown tie-breaking depends on the order answers were submitted, so
/// inputs and the per-category maps derived from them keep JSON document order
/// on the way in and on the way out. Re-inserting a key replaces the value but
/// keeps the original position. Lookups and inserts are constant time, so
/// oversized payloads stay linear to parse and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedMap<V> {
    entries: IndexMap<String, V>,
}

/// Raw questionnaire answers keyed by category key.
pub type UserInputs = OrderedMap<String>;

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Rejections raised by the questionnaire layer before answers reach the estimator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please fill in all fields. Missing: {}", .0.key())]
    MissingField(Category),
}

/// Require an answer for each of the eight questions.
///
/// Extra keys are allowed; the estimator scores them as zero.
pub fn validate_inputs(inputs: &UserInputs) -> Result<(), InputError> {
    for category in Category::ordered() {
        let answered = inputs
            .get(category.key())
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false);
        if !answered {
            return Err(InputError::MissingField(category));
        }
    }
    Ok(())
}
