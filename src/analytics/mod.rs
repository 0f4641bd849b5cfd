mod correlation;
mod error;
mod metrics;

pub use correlation::{correlate, correlate_series, pearson, CorrelationMatrix};
pub use error::CorrelationError;
pub use metrics::{
    mean, speed_mps, summarize, OrbitClass, SummaryMetrics, GEO_FLOOR_M, LEO_CEILING_M,
};
