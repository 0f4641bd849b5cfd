mod error;
mod model;
mod series;
mod window;

pub use error::PropagateError;
pub use model::{OrbitModel, Sgp4Model, Sgp4State, StateVector};
pub use series::{propagate, propagate_all, propagate_with, PropagatedSeries, Sample};
pub use window::Window;
