use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::core::extent::Extent;
use crate::error::{ScaleError, ScaleResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One record of a series: a key (x position) and a value (y contribution).
///
/// Both fields are plain `f64`. Conversions from richer source types are
/// explicit constructors so callers always see which coercion they get.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    pub key: f64,
    pub value: f64,
}

impl Datum {
    #[must_use]
    pub fn new(key: f64, value: f64) -> Self {
        Self { key, value }
    }

    /// Builds a datum keyed by a UTC timestamp coerced to epoch milliseconds.
    #[must_use]
    pub fn from_temporal(time: DateTime<Utc>, value: f64) -> Self {
        Self {
            key: datetime_to_epoch_millis(time),
            value,
        }
    }

    /// Builds a datum from a decimal value, failing when the decimal has no
    /// `f64` representation.
    pub fn from_decimal(key: f64, value: Decimal) -> ScaleResult<Self> {
        Ok(Self {
            key,
            value: decimal_to_f64(value, "value")?,
        })
    }

    pub fn from_temporal_decimal(time: DateTime<Utc>, value: Decimal) -> ScaleResult<Self> {
        Ok(Self {
            key: datetime_to_epoch_millis(time),
            value: decimal_to_f64(value, "value")?,
        })
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.key.is_finite() && self.value.is_finite()
    }
}

/// Named, ordered run of data records.
///
/// Record order is meaningful: the stacking key union is built in first-seen
/// order across series, so callers control layout by the order they emit
/// records in.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    data: Vec<Datum>,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<Datum>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &[Datum] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extent of the record keys, skipping non-finite entries.
    #[must_use]
    pub fn key_extent(&self) -> Option<Extent> {
        Extent::over(self.data.iter().map(|datum| datum.key))
    }

    /// Extent of the record values, skipping non-finite entries.
    #[must_use]
    pub fn value_extent(&self) -> Option<Extent> {
        Extent::over(self.data.iter().map(|datum| datum.value))
    }

    /// Decomposes the series into its name and records.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Datum>) {
        (self.name, self.data)
    }

    pub(crate) fn replace_data(&mut self, data: Vec<Datum>) {
        self.data = data;
    }
}

pub(crate) fn decimal_to_f64(value: Decimal, field_name: &str) -> ScaleResult<f64> {
    value.to_f64().ok_or_else(|| {
        ScaleError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub(crate) fn datetime_to_epoch_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}
