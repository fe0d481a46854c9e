use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(feature = "parallel-stacking")]
use rayon::prelude::*;

use crate::core::extent::Extent;
use crate::core::types::{Datum, Series};

/// One stacked record: the original value plus the cumulative offset
/// contributed by every earlier series at the same key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackedDatum {
    pub key: f64,
    pub value: f64,
    pub offset: f64,
}

impl StackedDatum {
    /// Upper edge of this record's band.
    #[must_use]
    pub fn top(self) -> f64 {
        self.offset + self.value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedSeries {
    pub name: String,
    pub points: Vec<StackedDatum>,
}

/// Result of one stacking pass.
///
/// `keys` is the ordered key union; every entry of `series` holds exactly one
/// point per key, aligned by position. `total_extent` spans all band tops and
/// always contains the zero baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackOutput {
    pub series: Vec<StackedSeries>,
    pub keys: Vec<f64>,
    pub total_extent: Extent,
}

impl StackOutput {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            series: Vec::new(),
            keys: Vec::new(),
            total_extent: Extent::point(0.0),
        }
    }
}

impl Default for StackOutput {
    fn default() -> Self {
        Self::empty()
    }
}

type RecordIndex = (IndexMap<OrderedFloat<f64>, f64>, usize, usize);

/// Stacks `series` bottom-up in slice order.
///
/// The key union is built in first-seen order across all series. A series
/// without a record at some key contributes value `0` at the running offset,
/// so bands never collapse over sparse data. Within one series the last
/// record at a duplicated key wins; drops and overwrites are logged with
/// counts. Identical input always produces bit-identical output.
#[must_use]
pub fn compute_stack(series: &[Series]) -> StackOutput {
    if series.is_empty() {
        return StackOutput::empty();
    }

    let keys = key_union(series.iter().map(Series::data), &|datum: &Datum| datum.key);

    #[cfg(feature = "parallel-stacking")]
    let indexes: Vec<RecordIndex> = series
        .par_iter()
        .map(|series| {
            index_records(
                series.data(),
                &|datum: &Datum| datum.key,
                &|datum: &Datum| datum.value,
            )
        })
        .collect();

    #[cfg(not(feature = "parallel-stacking"))]
    let indexes: Vec<RecordIndex> = series
        .iter()
        .map(|series| {
            index_records(
                series.data(),
                &|datum: &Datum| datum.key,
                &|datum: &Datum| datum.value,
            )
        })
        .collect();

    let names: Vec<&str> = series.iter().map(Series::name).collect();
    assemble(&names, indexes, keys)
}

/// Stacks arbitrary records through explicit key and value accessors.
///
/// Semantics match [`compute_stack`]; the accessors make the coercion into
/// `f64` visible at the call site instead of hiding it in a conversion trait.
#[must_use]
pub fn compute_stack_with<T>(
    series: &[(&str, &[T])],
    key_of: impl Fn(&T) -> f64,
    value_of: impl Fn(&T) -> f64,
) -> StackOutput {
    if series.is_empty() {
        return StackOutput::empty();
    }

    let keys = key_union(series.iter().map(|(_, data)| *data), &key_of);
    let indexes: Vec<RecordIndex> = series
        .iter()
        .map(|(_, data)| index_records(data, &key_of, &value_of))
        .collect();
    let names: Vec<&str> = series.iter().map(|(name, _)| *name).collect();
    assemble(&names, indexes, keys)
}

fn key_union<'a, T: 'a>(
    series_data: impl Iterator<Item = &'a [T]>,
    key_of: &impl Fn(&T) -> f64,
) -> Vec<f64> {
    let mut keys: IndexSet<OrderedFloat<f64>> = IndexSet::new();
    for data in series_data {
        for record in data {
            let key = key_of(record);
            if key.is_finite() {
                keys.insert(OrderedFloat(key));
            }
        }
    }
    keys.into_iter().map(OrderedFloat::into_inner).collect()
}

fn index_records<T>(
    data: &[T],
    key_of: &impl Fn(&T) -> f64,
    value_of: &impl Fn(&T) -> f64,
) -> RecordIndex {
    let mut map: IndexMap<OrderedFloat<f64>, f64> = IndexMap::with_capacity(data.len());
    let mut dropped = 0_usize;
    let mut duplicates = 0_usize;
    for record in data {
        let key = key_of(record);
        let value = value_of(record);
        if !key.is_finite() || !value.is_finite() {
            dropped += 1;
            continue;
        }
        if map.insert(OrderedFloat(key), value).is_some() {
            duplicates += 1;
        }
    }
    (map, dropped, duplicates)
}

fn assemble(names: &[&str], indexes: Vec<RecordIndex>, keys: Vec<f64>) -> StackOutput {
    let mut dropped_total = 0_usize;
    let mut duplicate_total = 0_usize;
    let mut offsets = vec![0.0_f64; keys.len()];
    let mut stacked = Vec::with_capacity(names.len());
    let mut extent: Option<Extent> = None;

    for (name, (index, dropped, duplicates)) in names.iter().zip(indexes) {
        dropped_total += dropped;
        duplicate_total += duplicates;

        let mut points = Vec::with_capacity(keys.len());
        for (slot, key) in keys.iter().copied().enumerate() {
            let value = index.get(&OrderedFloat(key)).copied().unwrap_or(0.0);
            let point = StackedDatum {
                key,
                value,
                offset: offsets[slot],
            };
            let top = point.top();
            extent = Some(match extent {
                Some(current) => current.include(top),
                None => Extent::point(top),
            });
            offsets[slot] += value;
            points.push(point);
        }
        stacked.push(StackedSeries {
            name: (*name).to_owned(),
            points,
        });
    }

    if dropped_total > 0 || duplicate_total > 0 {
        warn!(
            dropped_count = dropped_total,
            duplicate_count = duplicate_total,
            "canonicalized records while stacking"
        );
    }

    let total_extent = extent.map_or(Extent::point(0.0), |extent| extent.include(0.0));
    StackOutput {
        series: stacked,
        keys,
        total_extent,
    }
}
