use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropagateError {
    #[error("invalid tle: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("sampling step must be at least one minute")]
    InvalidStep,
    #[error("window of {samples} samples exceeds the limit of {limit}")]
    WindowTooLarge { samples: usize, limit: usize },
}
