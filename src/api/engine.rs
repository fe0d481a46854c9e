use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::core::{
    Domainer, Extent, NiceTickGenerator, QuantitativeScale, Series, StackOutput, StackedSeries,
    TickGenerator, Viewport, stacking,
};
use crate::error::{ScaleError, ScaleResult};

use super::chart_model::{ChartModel, StackCache};
use super::engine_config::{ChartEngineConfig, SeriesComposition};

/// Registry id the stacked-total extent is reported under on the value scale.
const STACK_TOTAL_SOURCE: &str = "stacked-total";

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns the key and value scales, the ordered series set, and
/// the stack cache, and keeps them consistent: every data mutation bumps the
/// series version, re-stacks, re-registers extents and re-derives automatic
/// domains before the call returns.
pub struct ChartEngine {
    pub(super) model: ChartModel,
    pub(super) config: ChartEngineConfig,
}

impl ChartEngine {
    pub fn new(config: ChartEngineConfig) -> ScaleResult<Self> {
        if !config.viewport.is_valid() {
            return Err(ScaleError::InvalidViewport {
                width: config.viewport.width,
                height: config.viewport.height,
            });
        }
        let config = config.validate()?;

        let mut engine = Self {
            model: ChartModel::new(config.viewport),
            config,
        };
        let generator = Arc::new(NiceTickGenerator::new(config.tick_count));
        engine
            .model
            .key_scale
            .set_tick_generator(Arc::clone(&generator) as Arc<dyn TickGenerator>);
        engine.model.value_scale.set_tick_generator(generator);
        engine.install_value_domainer();
        Ok(engine)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.model.viewport
    }

    /// Resizes the pixel area and refits both scale ranges.
    pub fn set_viewport(&mut self, viewport: Viewport) -> ScaleResult<()> {
        if !viewport.is_valid() {
            return Err(ScaleError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.model.viewport = viewport;
        self.model
            .key_scale
            .set_range((0.0, f64::from(viewport.width)));
        self.model
            .value_scale
            .set_range((f64::from(viewport.height), 0.0));
        debug!(
            width = viewport.width,
            height = viewport.height,
            "resized viewport"
        );
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        self.config
    }

    #[must_use]
    pub fn composition(&self) -> SeriesComposition {
        self.config.composition
    }

    /// Switches between overlaid and stacked value-domain derivation.
    pub fn set_composition(&mut self, composition: SeriesComposition) {
        if self.config.composition == composition {
            return;
        }
        self.config.composition = composition;
        debug!(?composition, "switched series composition");
        self.refresh_value_extents();
    }

    #[must_use]
    pub fn key_scale(&self) -> &QuantitativeScale {
        &self.model.key_scale
    }

    pub fn key_scale_mut(&mut self) -> &mut QuantitativeScale {
        &mut self.model.key_scale
    }

    #[must_use]
    pub fn value_scale(&self) -> &QuantitativeScale {
        &self.model.value_scale
    }

    pub fn value_scale_mut(&mut self) -> &mut QuantitativeScale {
        &mut self.model.value_scale
    }

    #[must_use]
    pub fn key_to_pixel(&self, key: f64) -> f64 {
        self.model.key_scale.scale(key)
    }

    #[must_use]
    pub fn pixel_to_key(&self, pixel: f64) -> f64 {
        self.model.key_scale.invert(pixel)
    }

    #[must_use]
    pub fn value_to_pixel(&self, value: f64) -> f64 {
        self.model.value_scale.scale(value)
    }

    #[must_use]
    pub fn pixel_to_value(&self, pixel: f64) -> f64 {
        self.model.value_scale.invert(pixel)
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.model.series
    }

    #[must_use]
    pub fn series_names(&self) -> Vec<&str> {
        self.model.series.iter().map(Series::name).collect()
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.model.series.len()
    }

    /// Version counter bumped by every series mutation; the stack cache is
    /// keyed by it.
    #[must_use]
    pub fn data_version(&self) -> u64 {
        self.model.data_version
    }

    /// Current stack of all registered series, in registration order.
    #[must_use]
    pub fn stack_output(&self) -> &StackOutput {
        &self.model.stack.output
    }

    #[must_use]
    pub fn stacked_series(&self) -> &[StackedSeries] {
        &self.model.stack.output.series
    }

    /// Extent of the stacked band tops, clamped to include the zero baseline.
    #[must_use]
    pub fn total_extent(&self) -> Extent {
        self.model.stack.output.total_extent
    }

    #[must_use]
    pub fn key_ticks(&self) -> Vec<f64> {
        self.model.key_scale.ticks()
    }

    #[must_use]
    pub fn value_ticks(&self) -> Vec<f64> {
        self.model.value_scale.ticks()
    }

    /// Puts both scales back into automatic mode.
    pub fn auto_domain_all(&mut self) {
        self.model.key_scale.auto_domain();
        self.model.value_scale.auto_domain();
    }

    pub(super) fn refresh_after_data_change(&mut self) {
        self.rebuild_stack_cache();
        self.refresh_key_extents();
        self.refresh_value_extents();
        trace!(
            data_version = self.model.data_version,
            series_count = self.model.series.len(),
            "refreshed engine state"
        );
    }

    fn rebuild_stack_cache(&mut self) {
        if self.model.stack.version == self.model.data_version {
            return;
        }
        let output = stacking::compute_stack(&self.model.series);
        trace!(
            data_version = self.model.data_version,
            key_count = output.keys.len(),
            "rebuilt stack cache"
        );
        self.model.stack = StackCache {
            version: self.model.data_version,
            output,
        };
    }

    fn refresh_key_extents(&mut self) {
        self.model.key_scale.clear_extents();
        for series in &self.model.series {
            if let Some(extent) = series.key_extent() {
                self.model
                    .key_scale
                    .update_extent(series.name().to_owned(), extent);
            }
        }
    }

    fn refresh_value_extents(&mut self) {
        self.install_value_domainer();
        self.model.value_scale.clear_extents();
        match self.config.composition {
            SeriesComposition::Overlaid => {
                for series in &self.model.series {
                    if let Some(extent) = series.value_extent() {
                        self.model
                            .value_scale
                            .update_extent(series.name().to_owned(), extent);
                    }
                }
            }
            SeriesComposition::Stacked => {
                let has_keys = !self.model.stack.output.keys.is_empty();
                let total_extent = self.model.stack.output.total_extent;
                if has_keys {
                    self.model
                        .value_scale
                        .update_extent(STACK_TOTAL_SOURCE, total_extent);
                }
            }
        }
    }

    fn install_value_domainer(&mut self) {
        if self.model.value_scale.user_set_domainer() {
            return;
        }
        match self.baseline_value_domainer() {
            Ok(domainer) => self.model.value_scale.install_domainer(domainer),
            Err(err) => warn!(error = %err, "keeping previous value domainer"),
        }
    }

    fn baseline_value_domainer(&self) -> ScaleResult<Domainer> {
        let mut domainer =
            Domainer::new().with_padding_proportion(self.config.value_padding_proportion)?;
        if self.config.nice_value_domain {
            domainer = domainer.with_nice_count(self.config.tick_count);
        }
        if self.config.composition == SeriesComposition::Stacked {
            domainer = domainer
                .with_included_value(0.0)
                .with_padding_exception(0.0);
        }
        Ok(domainer)
    }
}
