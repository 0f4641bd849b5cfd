use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::records::{RecordSummary, ReplaceResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::records::list_records,
        super::api::records::replace_records,
        super::api::records::reload_records,
        super::api::records::get_series,
        super::api::records::get_summary,
        super::api::records::get_correlation,
    ),
    components(
        schemas(
            RecordSummary,
            ReplaceResponse,
            ErrorResponse,
            crate::propagate::PropagatedSeries,
            crate::propagate::Sample,
            crate::analytics::SummaryMetrics,
            crate::analytics::OrbitClass,
            crate::analytics::CorrelationMatrix,
        )
    ),
    info(
        title = "Satscope API",
        description = "Element-set propagation series and orbit analytics",
        version = "0.1.0"
    ),
    tags(
        (name = "records", description = "Element sets and their derived series")
    )
)]
pub struct ApiDoc;
