//! Pure transforms from upstream rows to dense, plot-ready century series.

pub mod century_counter;
pub mod population;

pub use century_counter::{count_by_century, CenturyTagged};
pub use population::{reconcile, PopulationSeries};
