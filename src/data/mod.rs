//! data/mod.rs — Flat-key results mappings produced by the fitting stage.
//!
//! Results arrive as a mapping from parameter names to numeric columns:
//! `offset`, `exponent`, `error`, `r_squared`, optionally `knee`, plus
//! band-specific keys following `{band}_{cf|pw|bw}` (or bare `cf`/`pw`/`bw`
//! when exactly one peak is modeled). Key order is meaningful — band order
//! is recovered from it — so the map preserves insertion order.

pub mod utils;

use std::fmt;

/// One column of a results mapping.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultsValue {
    /// One value per fitted spectrum (or per time bin).
    Series(Vec<f32>),
    /// One row per spectrum/event, columns per repeated fit or time bin.
    Matrix(Vec<Vec<f32>>),
}

impl ResultsValue {
    pub fn series(&self) -> Option<&[f32]> {
        match self {
            ResultsValue::Series(v) => Some(v),
            ResultsValue::Matrix(_) => None,
        }
    }

    pub fn matrix(&self) -> Option<&[Vec<f32>]> {
        match self {
            ResultsValue::Series(_) => None,
            ResultsValue::Matrix(m) => Some(m),
        }
    }
}

/// Minimal insertion-ordered string-keyed map.
///
/// Replacing an existing key keeps its original position, so the band order
/// encoded by the producer survives round trips.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// The full results mapping for a model, group, spectrogram, or event set.
pub type ModelResults = OrderedMap<ResultsValue>;

/// Projection of one flat index across all keys.
pub type ScalarResults = OrderedMap<f32>;

/// Projection of one matrix row across all keys.
pub type RowResults = OrderedMap<Vec<f32>>;

/// Errors raised by the selector utilities. One clear error per call, never
/// a partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsError {
    /// The requested index is past the end of a column.
    IndexOutOfBounds { key: String, index: usize, len: usize },
    /// A column was expected to be one-dimensional.
    NotSeries { key: String },
    /// A column was expected to be two-dimensional.
    NotMatrix { key: String },
    /// A band attribute key implied by the label set is absent.
    MissingKey { key: String },
}

impl fmt::Display for ResultsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsError::IndexOutOfBounds { key, index, len } => {
                write!(f, "index {index} out of bounds for '{key}' (len {len})")
            }
            ResultsError::NotSeries { key } => {
                write!(f, "'{key}' is not a one-dimensional series")
            }
            ResultsError::NotMatrix { key } => {
                write!(f, "'{key}' is not a two-dimensional matrix")
            }
            ResultsError::MissingKey { key } => {
                write!(f, "expected key '{key}' is missing from the results mapping")
            }
        }
    }
}

impl std::error::Error for ResultsError {}
