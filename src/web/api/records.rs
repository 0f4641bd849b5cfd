use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::analytics::{correlate_series, summarize, CorrelationMatrix, SummaryMetrics};
use crate::config::parse_minutes;
use crate::elements::{parse_records, ElementSetRecord};
use crate::propagate::{propagate, PropagatedSeries, Window};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct WindowQuery {
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start: Option<DateTime<Utc>>,
    pub minutes: Option<u32>,
    pub step: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordSummary {
    pub index: usize,
    pub name: String,
    pub catalog_number: Option<u32>,
}

impl From<&ElementSetRecord> for RecordSummary {
    fn from(record: &ElementSetRecord) -> Self {
        Self {
            index: record.index,
            name: record.name.clone(),
            catalog_number: record.catalog_number(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplaceResponse {
    pub record_count: usize,
}

#[utoipa::path(
    get,
    path = "/api/records",
    tag = "records",
    responses(
        (status = 200, description = "Parsed element sets", body = Vec<RecordSummary>)
    )
)]
pub async fn list_records(State(state): State<AppState>) -> Json<Vec<RecordSummary>> {
    let records = state.records.read().await;
    Json(records.iter().map(RecordSummary::from).collect())
}

#[utoipa::path(
    put,
    path = "/api/records",
    tag = "records",
    request_body(content = String, content_type = "text/plain", description = "Three-line element-set text"),
    responses(
        (status = 200, description = "Record set replaced", body = ReplaceResponse)
    )
)]
pub async fn replace_records(State(state): State<AppState>, body: String) -> Json<ReplaceResponse> {
    let record_count = state.replace_records(parse_records(&body)).await;
    log::info!("Record set replaced, {} element sets", record_count);
    Json(ReplaceResponse { record_count })
}

#[utoipa::path(
    post,
    path = "/api/records/reload",
    tag = "records",
    responses(
        (status = 200, description = "Record set reloaded from the configured file", body = ReplaceResponse),
        (status = 500, description = "File could not be read", body = ErrorResponse)
    )
)]
pub async fn reload_records(State(state): State<AppState>) -> ApiResult<Json<ReplaceResponse>> {
    let records = state.read_tle_file()?;
    let record_count = state.replace_records(records).await;
    log::info!(
        "Reloaded {} element sets from {}",
        record_count,
        state.config.tle_file.display()
    );
    Ok(Json(ReplaceResponse { record_count }))
}

#[utoipa::path(
    get,
    path = "/api/records/{index}/series",
    tag = "records",
    params(
        ("index" = usize, Path, description = "Record index"),
        ("start" = Option<String>, Query, description = "Window start (RFC3339), defaults to now"),
        ("minutes" = Option<u32>, Query, description = "Window length in minutes"),
        ("step" = Option<u32>, Query, description = "Sampling step in minutes")
    ),
    responses(
        (status = 200, description = "Propagated series, possibly empty", body = PropagatedSeries),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 404, description = "Unknown record", body = ErrorResponse)
    )
)]
pub async fn get_series(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<PropagatedSeries>> {
    Ok(Json(series_for(&state, index, &query).await?))
}

#[utoipa::path(
    get,
    path = "/api/records/{index}/summary",
    tag = "records",
    params(
        ("index" = usize, Path, description = "Record index"),
        ("start" = Option<String>, Query, description = "Window start (RFC3339), defaults to now"),
        ("minutes" = Option<u32>, Query, description = "Window length in minutes"),
        ("step" = Option<u32>, Query, description = "Sampling step in minutes")
    ),
    responses(
        (status = 200, description = "Summary metrics, null fields when nothing propagated", body = SummaryMetrics),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 404, description = "Unknown record", body = ErrorResponse)
    )
)]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<SummaryMetrics>> {
    let series = series_for(&state, index, &query).await?;
    Ok(Json(summarize(&series)))
}

#[utoipa::path(
    get,
    path = "/api/records/{index}/correlation",
    tag = "records",
    params(
        ("index" = usize, Path, description = "Record index"),
        ("start" = Option<String>, Query, description = "Window start (RFC3339), defaults to now"),
        ("minutes" = Option<u32>, Query, description = "Window length in minutes"),
        ("step" = Option<u32>, Query, description = "Sampling step in minutes")
    ),
    responses(
        (status = 200, description = "Altitude/speed/latitude correlation, null when nothing propagated", body = Option<CorrelationMatrix>),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 404, description = "Unknown record", body = ErrorResponse)
    )
)]
pub async fn get_correlation(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<Option<CorrelationMatrix>>> {
    let series = series_for(&state, index, &query).await?;
    if series.is_empty() {
        return Ok(Json(None));
    }
    Ok(Json(Some(correlate_series(&series)?)))
}

fn resolve_window(state: &AppState, query: &WindowQuery) -> ApiResult<Window> {
    let start = query.start.unwrap_or_else(Utc::now);
    let minutes = match query.minutes {
        Some(m) => m,
        None => parse_minutes(&state.config.window)?,
    };
    let step = match query.step {
        Some(s) => s,
        None => parse_minutes(&state.config.step)?,
    };
    Window::new(start, minutes)
        .with_step(step)
        .and_then(Window::bounded)
        .map_err(|e| ApiError::Validation(e.to_string()))
}

async fn series_for(
    state: &AppState,
    index: usize,
    query: &WindowQuery,
) -> ApiResult<PropagatedSeries> {
    let window = resolve_window(state, query)?;
    let record = state.record(index).await.ok_or(ApiError::NotFound(index))?;

    tokio::task::spawn_blocking(move || propagate(&record, &window))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))
}

fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Some(s) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{http::StatusCode, response::IntoResponse};
    use chrono::TimeZone;

    const TLE: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
BROKEN
1 nothing here
2 nothing here
";

    fn state() -> AppState {
        let config = Config::from_yaml("tle_file: /nonexistent/tle.txt\nwindow: 10m\n").unwrap();
        AppState::new(config, parse_records(TLE))
    }

    fn query(minutes: Option<u32>, step: Option<u32>) -> WindowQuery {
        WindowQuery {
            start: Some(Utc.with_ymd_and_hms(2020, 7, 12, 21, 20, 0).unwrap()),
            minutes,
            step,
        }
    }

    #[tokio::test]
    async fn lists_records() {
        let Json(records) = list_records(State(state())).await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].catalog_number, Some(25544));
        assert_eq!(records[1].name, "BROKEN");
    }

    #[tokio::test]
    async fn series_uses_configured_window() {
        let Json(series) = get_series(State(state()), Path(0), Query(query(None, None)))
            .await
            .unwrap();
        assert_eq!(series.len(), 11);
    }

    #[tokio::test]
    async fn summary_of_unpropagatable_record_is_undefined() {
        let Json(summary) = get_summary(State(state()), Path(1), Query(query(Some(5), None)))
            .await
            .unwrap();
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.mean_altitude_m, None);
        assert_eq!(summary.orbit_class, None);
    }

    #[tokio::test]
    async fn correlation_for_valid_and_empty_series() {
        let Json(matrix) = get_correlation(State(state()), Path(0), Query(query(Some(30), None)))
            .await
            .unwrap();
        let matrix = matrix.unwrap();
        assert_eq!(matrix.labels(), ["Altitude", "Speed", "Latitude"]);
        assert_eq!(matrix.get(1, 1), Some(1.0));

        let Json(empty) = get_correlation(State(state()), Path(1), Query(query(None, None)))
            .await
            .unwrap();
        assert!(empty.is_none());
    }

    #[tokio::test]
    async fn unknown_index_and_zero_step_are_rejected() {
        let err = get_series(State(state()), Path(7), Query(query(None, None)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(7)));

        let err = get_series(State(state()), Path(0), Query(query(None, Some(0))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn oversized_window_is_a_bad_request() {
        let err = get_series(State(state()), Path(0), Query(query(Some(u32::MAX), None)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let Json(series) = get_series(
            State(state()),
            Path(0),
            Query(query(Some(u32::MAX), Some(u32::MAX))),
        )
        .await
        .unwrap();
        assert!(series.len() <= 2);
    }

    #[tokio::test]
    async fn replace_swaps_the_whole_set() {
        let state = state();
        let body = TLE.lines().take(3).collect::<Vec<_>>().join("\n");
        let Json(response) = replace_records(State(state.clone()), body).await;
        assert_eq!(response.record_count, 1);
        assert!(state.record(1).await.is_none());
    }

    #[tokio::test]
    async fn reload_reports_missing_file() {
        let err = reload_records(State(state())).await.unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
    }
}
