use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("series '{0}' is empty")]
    EmptySeries(String),
    #[error("series '{label}' has {actual} samples, expected {expected}")]
    LengthMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate series label '{0}'")]
    DuplicateLabel(String),
}
