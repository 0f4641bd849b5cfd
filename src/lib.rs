//! Element-set propagation and orbit analytics.
//!
//! The pipeline runs strictly forward:
//! text -> [`elements::parse_records`] -> [`propagate::propagate`] ->
//! [`analytics::summarize`] / [`analytics::correlate`].

pub mod analytics;
pub mod config;
pub mod elements;
pub mod geodetic;
pub mod propagate;
pub mod report;
pub mod web;

pub use analytics::{correlate, summarize, CorrelationMatrix, OrbitClass, SummaryMetrics};
pub use elements::{parse_records, ElementSetRecord};
pub use propagate::{propagate, PropagatedSeries, Window};
pub use report::{analyze, analyze_text, SatelliteReport};
