use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Extent, QuantitativeScale, StackedSeries, Viewport};
use crate::error::{ScaleError, ScaleResult};

use super::engine::ChartEngine;
use super::engine_config::SeriesComposition;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub viewport: Viewport,
    pub composition: SeriesComposition,
    pub data_version: u64,
    pub key_scale: ScaleSnapshot,
    pub value_scale: ScaleSnapshot,
    pub series: IndexMap<String, SeriesDigest>,
    pub stacked: Vec<StackedSeries>,
    pub stack_keys: Vec<f64>,
    pub total_extent: Extent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSnapshot {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub automatic: bool,
    pub ticks: Vec<f64>,
}

/// Per-series summary carried by the snapshot instead of the raw records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesDigest {
    pub record_count: usize,
    pub key_extent: Option<Extent>,
    pub value_extent: Option<Extent>,
}

impl ChartEngine {
    /// Read-only state fan-out for consumers that must not hold a live
    /// reference into the engine.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let mut series = IndexMap::with_capacity(self.model.series.len());
        for entry in &self.model.series {
            series.insert(
                entry.name().to_owned(),
                SeriesDigest {
                    record_count: entry.len(),
                    key_extent: entry.key_extent(),
                    value_extent: entry.value_extent(),
                },
            );
        }

        EngineSnapshot {
            viewport: self.model.viewport,
            composition: self.config.composition,
            data_version: self.model.data_version,
            key_scale: scale_snapshot(&self.model.key_scale),
            value_scale: scale_snapshot(&self.model.value_scale),
            series,
            stacked: self.model.stack.output.series.clone(),
            stack_keys: self.model.stack.output.keys.clone(),
            total_extent: self.model.stack.output.total_extent,
        }
    }

    /// Serializes the snapshot to pretty JSON.
    pub fn snapshot_json_pretty(&self) -> ScaleResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| ScaleError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}

fn scale_snapshot(scale: &QuantitativeScale) -> ScaleSnapshot {
    ScaleSnapshot {
        domain: scale.domain(),
        range: scale.range(),
        automatic: scale.is_automatic(),
        ticks: scale.ticks(),
    }
}
