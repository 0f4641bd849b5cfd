use std::num::NonZeroU32;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::propagate::PropagateError;

/// Sampling plan: offsets `0..=minutes` from `start`, stepping by
/// `step_minutes`. The end is sampled only when the step divides `minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub minutes: u32,
    pub step_minutes: NonZeroU32,
}

impl Window {
    /// Largest sample count accepted from external input (CLI, config, API).
    pub const MAX_SAMPLES: usize = 100_000;

    pub fn new(start: DateTime<Utc>, minutes: u32) -> Self {
        Self {
            start,
            minutes,
            step_minutes: NonZeroU32::MIN,
        }
    }

    pub fn with_step(self, step_minutes: u32) -> Result<Self, PropagateError> {
        let step_minutes = NonZeroU32::new(step_minutes).ok_or(PropagateError::InvalidStep)?;
        Ok(Self {
            step_minutes,
            ..self
        })
    }

    /// Reject plans with more than [`Window::MAX_SAMPLES`] samples.
    pub fn bounded(self) -> Result<Self, PropagateError> {
        let samples = self.sample_count();
        if samples > Self::MAX_SAMPLES {
            return Err(PropagateError::WindowTooLarge {
                samples,
                limit: Self::MAX_SAMPLES,
            });
        }
        Ok(self)
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(i64::from(self.minutes))
    }

    /// Minute offsets from `start`, in increasing order.
    pub fn offsets(&self) -> impl Iterator<Item = u32> {
        (0..=self.minutes).step_by(self.step_minutes.get() as usize)
    }

    pub fn sample_times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.offsets()
            .map(move |m| self.start + Duration::minutes(i64::from(m)))
    }

    /// Number of samples requested; the propagated series may hold fewer.
    pub fn sample_count(&self) -> usize {
        (self.minutes / self.step_minutes.get()) as usize + 1
    }
}
