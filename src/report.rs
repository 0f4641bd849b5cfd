use rayon::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::analytics::{correlate_series, summarize, CorrelationMatrix, SummaryMetrics};
use crate::elements::{parse_records, ElementSetRecord};
use crate::propagate::{propagate, PropagatedSeries, Window};

/// Everything derived for one record over one window.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SatelliteReport {
    pub record: ElementSetRecord,
    pub series: PropagatedSeries,
    pub summary: SummaryMetrics,
    /// Altitude/speed/latitude correlation; absent when nothing propagated.
    pub correlation: Option<CorrelationMatrix>,
}

pub fn analyze(record: &ElementSetRecord, window: &Window) -> SatelliteReport {
    let series = propagate(record, window);
    let summary = summarize(&series);
    let correlation = if !summary.is_defined() {
        None
    } else {
        correlate_series(&series)
            .map_err(|e| log::warn!("Correlation skipped for '{}': {}", record.name, e))
            .ok()
    };

    SatelliteReport {
        record: record.clone(),
        series,
        summary,
        correlation,
    }
}

/// Parse element-set text and analyze every record, in source order.
pub fn analyze_text(text: &str, window: &Window) -> Vec<SatelliteReport> {
    let records = parse_records(text);
    log::info!("Parsed {} element sets", records.len());

    records
        .par_iter()
        .map(|record| analyze(record, window))
        .collect()
}
