use axum::{routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::api::records as record_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;
use crate::config::Config;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/records",
            get(record_handlers::list_records).put(record_handlers::replace_records),
        )
        .route("/api/records/reload", post(record_handlers::reload_records))
        .route("/api/records/{index}/series", get(record_handlers::get_series))
        .route(
            "/api/records/{index}/summary",
            get(record_handlers::get_summary),
        )
        .route(
            "/api/records/{index}/correlation",
            get(record_handlers::get_correlation),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let state = AppState::new(config, Vec::new());

    match state.read_tle_file() {
        Ok(records) => {
            let count = state.replace_records(records).await;
            log::info!(
                "Loaded {} element sets from {}",
                count,
                state.config.tle_file.display()
            );
        }
        Err(e) => log::warn!(
            "Failed to read {}: {}",
            state.config.tle_file.display(),
            e
        ),
    }

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
