use crate::core::{QuantitativeScale, Series, StackOutput, Viewport};

/// Mutable engine state: both scales, the ordered series set with its version
/// counter, and the stack cache keyed by that counter.
#[derive(Debug)]
pub(super) struct ChartModel {
    pub(super) viewport: Viewport,
    pub(super) key_scale: QuantitativeScale,
    pub(super) value_scale: QuantitativeScale,
    pub(super) series: Vec<Series>,
    pub(super) data_version: u64,
    pub(super) stack: StackCache,
}

#[derive(Debug)]
pub(super) struct StackCache {
    pub(super) version: u64,
    pub(super) output: StackOutput,
}

impl ChartModel {
    pub(super) fn new(viewport: Viewport) -> Self {
        let mut key_scale = QuantitativeScale::new();
        key_scale.set_range((0.0, f64::from(viewport.width)));
        let mut value_scale = QuantitativeScale::new();
        // Pixel y grows downward, so the value range is reversed.
        value_scale.set_range((f64::from(viewport.height), 0.0));

        Self {
            viewport,
            key_scale,
            value_scale,
            series: Vec::new(),
            data_version: 0,
            stack: StackCache {
                version: 0,
                output: StackOutput::empty(),
            },
        }
    }

    pub(super) fn bump_data_version(&mut self) {
        self.data_version = self.data_version.wrapping_add(1);
    }

    pub(super) fn series_index(&self, name: &str) -> Option<usize> {
        self.series.iter().position(|series| series.name() == name)
    }
}
