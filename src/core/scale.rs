use std::sync::Arc;

use tracing::warn;

use crate::core::domainer::Domainer;
use crate::core::extent::{Extent, ExtentRegistry};
use crate::core::ticks::{self, NiceTickGenerator, TickGenerator};

pub const DEFAULT_NUM_TICKS: usize = 10;

const DEFAULT_EXTENT: Extent = Extent { min: 0.0, max: 1.0 };

/// Continuous, invertible mapping between a numeric domain and a pixel range.
///
/// The scale starts in automatic mode: its domain is derived from the extents
/// registered by data sources, run through the installed [`Domainer`].
/// Assigning a domain explicitly switches the scale to manual mode until
/// [`auto_domain`](Self::auto_domain) hands control back.
///
/// Domains and ranges never hold NaN or infinite bounds; offending
/// assignments are logged and dropped while the previous value stays active.
#[derive(Debug, Clone)]
pub struct QuantitativeScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
    automatic: bool,
    user_set_domainer: bool,
    domainer: Domainer,
    tick_generator: Arc<dyn TickGenerator>,
    extents: ExtentRegistry,
}

impl Default for QuantitativeScale {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantitativeScale {
    #[must_use]
    pub fn new() -> Self {
        Self {
            domain_start: DEFAULT_EXTENT.min,
            domain_end: DEFAULT_EXTENT.max,
            range_start: 0.0,
            range_end: 1.0,
            automatic: true,
            user_set_domainer: false,
            domainer: Domainer::default(),
            tick_generator: Arc::new(NiceTickGenerator::default()),
            extents: ExtentRegistry::new(),
        }
    }

    /// Maps a domain value to its range position.
    ///
    /// A zero-width domain maps every value to the range midpoint.
    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (value - self.domain_start) / span
        };
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    /// Maps a range position back to its domain value.
    #[must_use]
    pub fn invert(&self, position: f64) -> f64 {
        let span = self.range_end - self.range_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (position - self.range_start) / span
        };
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Assigns an explicit domain and leaves automatic mode.
    ///
    /// NaN or infinite bounds are rejected with a warning and the current
    /// domain stays in place; the scale still leaves automatic mode.
    pub fn set_domain(&mut self, domain: (f64, f64)) {
        self.automatic = false;
        self.apply_domain(domain);
    }

    /// Re-enables automatic mode and re-derives the domain from the
    /// registered extents.
    pub fn auto_domain(&mut self) {
        self.automatic = true;
        self.recompute_domain();
    }

    #[must_use]
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Assigns the pixel range. A reversed range (start greater than end) is
    /// valid and flips the mapping direction.
    pub fn set_range(&mut self, range: (f64, f64)) {
        let (start, end) = range;
        if !start.is_finite() || !end.is_finite() {
            warn!(
                range_start = start,
                range_end = end,
                "rejecting non-finite range, keeping current range"
            );
            return;
        }
        self.range_start = start;
        self.range_end = end;
    }

    /// Registers or replaces the extent reported by `source`, re-deriving the
    /// domain when in automatic mode.
    pub fn update_extent(&mut self, source: impl Into<String>, extent: Extent) {
        self.extents.update(source, extent);
        self.auto_domain_if_automatic();
    }

    /// Drops the extent registered under `source`, if any.
    pub fn remove_extent(&mut self, source: &str) {
        if self.extents.remove(source).is_some() {
            self.auto_domain_if_automatic();
        }
    }

    pub fn clear_extents(&mut self) {
        if !self.extents.is_empty() {
            self.extents.clear();
            self.auto_domain_if_automatic();
        }
    }

    #[must_use]
    pub fn extents(&self) -> &ExtentRegistry {
        &self.extents
    }

    /// Domain used when no source has registered an extent.
    #[must_use]
    pub fn default_extent(&self) -> Extent {
        DEFAULT_EXTENT
    }

    /// Ticks from the installed generator.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        self.tick_generator.ticks(self)
    }

    /// Ticks from the built-in nice-step algorithm, bypassing the installed
    /// generator.
    #[must_use]
    pub fn default_ticks(&self) -> Vec<f64> {
        ticks::linear_ticks(self.domain(), DEFAULT_NUM_TICKS)
    }

    /// Expands `domain` outward to nice step multiples.
    #[must_use]
    pub fn nice_domain(&self, domain: (f64, f64), count: Option<usize>) -> (f64, f64) {
        ticks::nice_bounds(domain, count.unwrap_or(DEFAULT_NUM_TICKS))
    }

    #[must_use]
    pub fn tick_generator(&self) -> Arc<dyn TickGenerator> {
        Arc::clone(&self.tick_generator)
    }

    pub fn set_tick_generator(&mut self, generator: Arc<dyn TickGenerator>) {
        self.tick_generator = generator;
    }

    #[must_use]
    pub fn domainer(&self) -> &Domainer {
        &self.domainer
    }

    /// Installs a domainer on behalf of the caller and marks the scale
    /// user-configured, so coordinating layers stop swapping in their own.
    pub fn set_domainer(&mut self, domainer: Domainer) {
        self.domainer = domainer;
        self.user_set_domainer = true;
        self.auto_domain_if_automatic();
    }

    /// Installs a domainer without claiming user ownership.
    pub(crate) fn install_domainer(&mut self, domainer: Domainer) {
        self.domainer = domainer;
        self.auto_domain_if_automatic();
    }

    #[must_use]
    pub fn user_set_domainer(&self) -> bool {
        self.user_set_domainer
    }

    /// Structural clone with the same domain, range, domainer and tick
    /// generator but no registered extents.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            domain_start: self.domain_start,
            domain_end: self.domain_end,
            range_start: self.range_start,
            range_end: self.range_end,
            automatic: self.automatic,
            user_set_domainer: self.user_set_domainer,
            domainer: self.domainer.clone(),
            tick_generator: Arc::clone(&self.tick_generator),
            extents: ExtentRegistry::new(),
        }
    }

    fn auto_domain_if_automatic(&mut self) {
        if self.automatic {
            self.recompute_domain();
        }
    }

    fn recompute_domain(&mut self) {
        let extents = self.extents.extents();
        let domainer = self.domainer.clone();
        let domain = domainer.compute_domain(&extents, self);
        self.apply_domain(domain);
    }

    fn apply_domain(&mut self, domain: (f64, f64)) {
        let (start, end) = domain;
        if !start.is_finite() || !end.is_finite() {
            warn!(
                domain_start = start,
                domain_end = end,
                "rejecting NaN or infinite domain, keeping current domain"
            );
            return;
        }
        self.domain_start = start;
        self.domain_end = end;
    }
}
