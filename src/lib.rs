//! scalestack: domain computation and data stacking for chart engines.
//!
//! The crate derives numeric domains from registered data series (extent
//! collection, padding, forced inclusion, nice rounding, tick generation),
//! maps domain values to pixel ranges bidirectionally, and stacks ordered
//! series with per-key cumulative offsets. Rendering, layout and input
//! handling are deliberately out of scope.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ScaleError, ScaleResult};
