use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::api::{
    timestamp_now, ApiError, HealthResponse, PredictRequest, PredictResponse, SuggestionsQuery,
    SuggestionsResponse,
};
use crate::config::{PredictConfig, ServiceConfig, SuggestionConfig};
use crate::service::TrendService;

#[derive(Clone)]
pub struct AppState {
    service: Arc<TrendService>,
    suggestions: SuggestionConfig,
    predict: PredictConfig,
}

impl AppState {
    pub fn new(service: TrendService, config: &ServiceConfig) -> Self {
        Self {
            service: Arc::new(service),
            suggestions: config.suggestions.clone(),
            predict: config.predict.clone(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/trending-suggestions", get(suggestions_handler))
        .route("/api/predict-trend", post(predict_handler))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
}

pub async fn serve(config: &ServiceConfig, service: TrendService) -> Result<(), String> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    info!(
        %addr,
        model_loaded = service.model_loaded(),
        "starting trend suggestion server"
    );
    let app = router(AppState::new(service, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.service.model_loaded(),
        model_version: state.service.model_version(),
        timestamp: timestamp_now(),
    })
}

async fn suggestions_handler(
    State(state): State<AppState>,
    query: Result<Query<SuggestionsQuery>, QueryRejection>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let Query(query) =
        query.map_err(|err| ApiError::BadRequest(format!("invalid query string: {}", err.body_text())))?;
    let count = query.resolve_count(&state.suggestions)?;
    let service = state.service.clone();
    let suggestions = tokio::task::spawn_blocking(move || service.generate(count))
        .await
        .map_err(|err| ApiError::Internal(format!("suggestion generation failed: {}", err)))?;

    Ok(Json(SuggestionsResponse {
        success: true,
        suggestions,
        timestamp: timestamp_now(),
    }))
}

async fn predict_handler(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|err| ApiError::BadRequest(format!("invalid request body: {}", err.body_text())))?;
    let candidate = request.into_candidate(&state.predict)?;

    let service = state.service.clone();
    let report = tokio::task::spawn_blocking(move || service.score(&candidate))
        .await
        .map_err(|err| ApiError::Internal(format!("prediction failed: {}", err)))?;

    Ok(Json(PredictResponse::from_report(&report)))
}
