pub mod domainer;
pub mod extent;
pub mod scale;
pub mod stacking;
pub mod ticks;
pub mod types;

pub use domainer::Domainer;
pub use extent::{Extent, ExtentRegistry};
pub use scale::{DEFAULT_NUM_TICKS, QuantitativeScale};
pub use stacking::{StackOutput, StackedDatum, StackedSeries, compute_stack, compute_stack_with};
pub use ticks::{
    IntegerTickGenerator, IntervalTickGenerator, LogTickGenerator, NiceTickGenerator,
    TickGenerator, TimeTickGenerator,
};
pub use types::{Datum, Series, Viewport};
