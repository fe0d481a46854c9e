use indexmap::IndexMap;
use indexmap::map::Entry;
use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::core::{Datum, Series};
use crate::error::{ScaleError, ScaleResult};

use super::engine::ChartEngine;
use super::engine_config::DuplicateKeyPolicy;

impl ChartEngine {
    /// Registers a new series at the end of the stack order.
    ///
    /// Records are canonicalized first: non-finite records are dropped and
    /// the configured duplicate-key policy is applied. A name collision with
    /// a registered series is rejected; use
    /// [`replace_series_data`](Self::replace_series_data) to swap data.
    pub fn insert_series(&mut self, series: Series) -> ScaleResult<()> {
        validate_series_name(series.name())?;
        if self.model.series_index(series.name()).is_some() {
            return Err(ScaleError::InvalidData(format!(
                "series '{}' is already registered",
                series.name()
            )));
        }

        let (name, data) = series.into_parts();
        let original_count = data.len();
        let data = canonicalize_records(&name, data, self.config.duplicate_key_policy)?;
        debug!(
            series = %name,
            original_count,
            canonical_count = data.len(),
            "insert series"
        );

        self.model.series.push(Series::new(name, data));
        self.model.bump_data_version();
        self.refresh_after_data_change();
        Ok(())
    }

    /// Replaces the records of a registered series, keeping its stack slot.
    pub fn replace_series_data(&mut self, name: &str, data: Vec<Datum>) -> ScaleResult<()> {
        let Some(index) = self.model.series_index(name) else {
            return Err(unknown_series(name));
        };

        let original_count = data.len();
        let data = canonicalize_records(name, data, self.config.duplicate_key_policy)?;
        debug!(
            series = %name,
            original_count,
            canonical_count = data.len(),
            "replace series data"
        );

        self.model.series[index].replace_data(data);
        self.model.bump_data_version();
        self.refresh_after_data_change();
        Ok(())
    }

    /// Removes a series and returns it.
    pub fn remove_series(&mut self, name: &str) -> ScaleResult<Series> {
        let Some(index) = self.model.series_index(name) else {
            return Err(unknown_series(name));
        };

        let removed = self.model.series.remove(index);
        debug!(series = %name, "remove series");
        self.model.bump_data_version();
        self.refresh_after_data_change();
        Ok(removed)
    }

    /// Moves a series to `index` in the stack order. Later series stack on
    /// top of earlier ones, so this reorders the bands.
    pub fn move_series(&mut self, name: &str, index: usize) -> ScaleResult<()> {
        let Some(current) = self.model.series_index(name) else {
            return Err(unknown_series(name));
        };
        if index >= self.model.series.len() {
            return Err(ScaleError::InvalidData(format!(
                "series index {index} out of bounds for {} series",
                self.model.series.len()
            )));
        }
        if current == index {
            return Ok(());
        }

        let series = self.model.series.remove(current);
        self.model.series.insert(index, series);
        debug!(series = %name, from = current, to = index, "move series");
        self.model.bump_data_version();
        self.refresh_after_data_change();
        Ok(())
    }

    /// Drops every registered series.
    pub fn clear_series(&mut self) {
        if self.model.series.is_empty() {
            return;
        }
        debug!(series_count = self.model.series.len(), "clear series");
        self.model.series.clear();
        self.model.bump_data_version();
        self.refresh_after_data_change();
    }
}

fn unknown_series(name: &str) -> ScaleError {
    ScaleError::InvalidData(format!("unknown series '{name}'"))
}

fn validate_series_name(name: &str) -> ScaleResult<()> {
    if name.trim().is_empty() {
        return Err(ScaleError::InvalidData(
            "series name must not be empty".to_owned(),
        ));
    }
    Ok(())
}

/// Drops non-finite records, then collapses duplicate keys.
///
/// Under `Overwrite` the last record at a key wins but keeps the first
/// occurrence's position, so the series' contribution to the stacking key
/// union is unaffected. Under `Reject` the first duplicate aborts the call.
fn canonicalize_records(
    series: &str,
    mut data: Vec<Datum>,
    policy: DuplicateKeyPolicy,
) -> ScaleResult<Vec<Datum>> {
    let original_len = data.len();
    data.retain(|datum| datum.is_finite());
    let filtered_count = original_len - data.len();

    let mut canonical: Vec<Datum> = Vec::with_capacity(data.len());
    let mut slots: IndexMap<OrderedFloat<f64>, usize> = IndexMap::with_capacity(data.len());
    let mut duplicate_count = 0_usize;
    for datum in data {
        match slots.entry(OrderedFloat(datum.key)) {
            Entry::Occupied(entry) => {
                if policy == DuplicateKeyPolicy::Reject {
                    return Err(ScaleError::DuplicateKey {
                        series: series.to_owned(),
                        key: datum.key,
                    });
                }
                canonical[*entry.get()] = datum;
                duplicate_count += 1;
            }
            Entry::Vacant(entry) => {
                entry.insert(canonical.len());
                canonical.push(datum);
            }
        }
    }

    if filtered_count > 0 || duplicate_count > 0 {
        warn!(
            series = %series,
            filtered_count,
            duplicate_count,
            canonical_count = canonical.len(),
            "canonicalized series records"
        );
    }
    Ok(canonical)
}
