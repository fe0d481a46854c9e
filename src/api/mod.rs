mod chart_model;
mod data_controller;
mod engine;
mod engine_config;
mod engine_snapshot;

pub use engine::ChartEngine;
pub use engine_config::{ChartEngineConfig, DuplicateKeyPolicy, SeriesComposition};
pub use engine_snapshot::{EngineSnapshot, ScaleSnapshot, SeriesDigest};
