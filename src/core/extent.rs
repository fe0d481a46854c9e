use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Closed numeric interval `[min, max]` with finite, ordered bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Builds an extent, swapping the bounds when they arrive reversed.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Zero-width extent at a single value.
    #[must_use]
    pub const fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Smallest extent covering every finite value in the iterator.
    ///
    /// Returns `None` when no finite value is present.
    #[must_use]
    pub fn over(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut result: Option<Self> = None;
        for value in values {
            if !value.is_finite() {
                continue;
            }
            result = Some(match result {
                Some(extent) => extent.include(value),
                None => Self::point(value),
            });
        }
        result
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Expands the extent just enough to contain `value`.
    ///
    /// Non-finite values leave the extent unchanged.
    #[must_use]
    pub fn include(self, value: f64) -> Self {
        if !value.is_finite() {
            return self;
        }
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.min == self.max
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    #[must_use]
    pub fn as_tuple(self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Insertion-ordered registry of per-source extents.
///
/// Each data source reports the extent of its own records under a stable id;
/// the registry answers with the union across all live sources. Iteration and
/// combination follow registration order, so identical registration sequences
/// produce identical results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtentRegistry {
    entries: IndexMap<String, Extent>,
}

impl ExtentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the extent reported by `source`.
    ///
    /// Non-finite extents are dropped with a warning; the previous entry for
    /// the source, if any, stays in place.
    pub fn update(&mut self, source: impl Into<String>, extent: Extent) {
        let source = source.into();
        if !extent.is_finite() {
            warn!(
                source = %source,
                min = extent.min,
                max = extent.max,
                "ignoring non-finite extent update"
            );
            return;
        }
        self.entries.insert(source, extent);
    }

    pub fn remove(&mut self, source: &str) -> Option<Extent> {
        self.entries.shift_remove(source)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn get(&self, source: &str) -> Option<Extent> {
        self.entries.get(source).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of all registered extents in registration order.
    #[must_use]
    pub fn combined(&self) -> Option<Extent> {
        self.entries.values().copied().reduce(Extent::union)
    }

    #[must_use]
    pub fn extents(&self) -> Vec<Extent> {
        self.entries.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Extent)> {
        self.entries
            .iter()
            .map(|(source, extent)| (source.as_str(), *extent))
    }
}
