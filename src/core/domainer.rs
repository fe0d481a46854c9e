use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::core::extent::Extent;
use crate::core::scale::QuantitativeScale;
use crate::error::{ScaleError, ScaleResult};

/// Absolute widening applied per side when the combined extent has zero width.
pub const IDENTICAL_BOUNDS_PADDING: f64 = 1.0;

/// Turns a set of per-source extents into one scale domain.
///
/// The pipeline is fixed: union the extents (falling back to the scale's
/// default extent when none are registered), force configured values into the
/// interval, pad proportionally, then optionally round outward to nice bounds.
/// Identical inputs and configuration always yield the identical domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Domainer {
    padding_proportion: f64,
    include_values: SmallVec<[f64; 2]>,
    padding_exceptions: SmallVec<[f64; 2]>,
    nice_enabled: bool,
    nice_count: Option<usize>,
}

impl Default for Domainer {
    fn default() -> Self {
        Self {
            padding_proportion: 0.0,
            include_values: SmallVec::new(),
            padding_exceptions: SmallVec::new(),
            nice_enabled: false,
            nice_count: None,
        }
    }
}

impl Domainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total padding proportion, split half per side.
    ///
    /// Rejects negative or non-finite proportions.
    pub fn with_padding_proportion(mut self, proportion: f64) -> ScaleResult<Self> {
        if !proportion.is_finite() || proportion < 0.0 {
            return Err(ScaleError::InvalidData(
                "padding proportion must be finite and >= 0".to_owned(),
            ));
        }
        self.padding_proportion = proportion;
        Ok(self)
    }

    /// Forces `value` into every computed domain.
    ///
    /// Non-finite values are dropped with a warning.
    #[must_use]
    pub fn with_included_value(mut self, value: f64) -> Self {
        if !value.is_finite() {
            warn!(value, "ignoring non-finite included value");
            return self;
        }
        if !self.include_values.contains(&value) {
            self.include_values.push(value);
        }
        self
    }

    /// Exempts a domain edge from padding when it lands exactly on `value`.
    ///
    /// Typical use is pinning a zero baseline so padding never pushes the
    /// domain below it.
    #[must_use]
    pub fn with_padding_exception(mut self, value: f64) -> Self {
        if !value.is_finite() {
            warn!(value, "ignoring non-finite padding exception");
            return self;
        }
        if !self.padding_exceptions.contains(&value) {
            self.padding_exceptions.push(value);
        }
        self
    }

    /// Enables nice rounding with the scale's default tick count.
    #[must_use]
    pub fn with_nice(mut self) -> Self {
        self.nice_enabled = true;
        self.nice_count = None;
        self
    }

    /// Enables nice rounding targeting `count` ticks.
    #[must_use]
    pub fn with_nice_count(mut self, count: usize) -> Self {
        self.nice_enabled = true;
        self.nice_count = Some(count);
        self
    }

    #[must_use]
    pub fn padding_proportion(&self) -> f64 {
        self.padding_proportion
    }

    #[must_use]
    pub fn include_values(&self) -> &[f64] {
        &self.include_values
    }

    #[must_use]
    pub fn padding_exceptions(&self) -> &[f64] {
        &self.padding_exceptions
    }

    #[must_use]
    pub fn is_nice_enabled(&self) -> bool {
        self.nice_enabled
    }

    /// Computes the domain for `extents` against `scale`.
    ///
    /// With no extents registered the scale's default extent seeds the
    /// pipeline, so an unconfigured scale still ends up with a usable domain.
    #[must_use]
    pub fn compute_domain(&self, extents: &[Extent], scale: &QuantitativeScale) -> (f64, f64) {
        let combined = extents
            .iter()
            .copied()
            .reduce(Extent::union)
            .unwrap_or_else(|| scale.default_extent());

        let included = self.apply_includes(combined);
        let padded = self.apply_padding(included);
        let domain = if self.nice_enabled {
            scale.nice_domain(padded.as_tuple(), self.nice_count)
        } else {
            padded.as_tuple()
        };

        trace!(
            extent_count = extents.len(),
            domain_min = domain.0,
            domain_max = domain.1,
            "computed domain"
        );
        domain
    }

    fn apply_includes(&self, extent: Extent) -> Extent {
        self.include_values
            .iter()
            .copied()
            .fold(extent, Extent::include)
    }

    fn apply_padding(&self, extent: Extent) -> Extent {
        if extent.is_degenerate() {
            return Extent::new(
                extent.min - IDENTICAL_BOUNDS_PADDING,
                extent.max + IDENTICAL_BOUNDS_PADDING,
            );
        }
        if self.padding_proportion == 0.0 {
            return extent;
        }

        let pad = extent.width() * self.padding_proportion / 2.0;
        let min = if self.is_padding_exception(extent.min) {
            extent.min
        } else {
            extent.min - pad
        };
        let max = if self.is_padding_exception(extent.max) {
            extent.max
        } else {
            extent.max + pad
        };
        Extent::new(min, max)
    }

    fn is_padding_exception(&self, value: f64) -> bool {
        self.padding_exceptions.contains(&value)
    }
}
