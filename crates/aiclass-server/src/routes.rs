//! Route table and handlers.

use std::sync::Arc;

use aiclass_ai::{BatchCoordinator, HybridEngine, ModelInfo};
use aiclass_core::{
    BatchPredictItem, Category, CategoryEntry, HealthResponse, PredictRequest, PredictResponse,
    RootResponse, text,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::error::ServerError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<HybridEngine>,
}

impl AppState {
    pub fn new(engine: Arc<HybridEngine>) -> Self {
        Self { engine }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/info", get(model_info))
        .route("/categories", get(categories))
        .route("/predict", post(predict))
        .route("/predict_batch", post(predict_batch))
        .with_state(state)
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI classification server is running".to_string(),
    })
}

/// 200 when the statistical model is loaded, 503 when running keyword-only.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let loaded = !state.engine.is_degraded();
    let (status, label) = if loaded {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            statistical_model: loaded,
            threshold: state.engine.threshold(),
        }),
    )
}

async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.engine.model_info())
}

async fn categories() -> Json<Vec<CategoryEntry>> {
    Json(Category::ALL.into_iter().map(CategoryEntry::from).collect())
}

async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ServerError> {
    let engine = state.engine.clone();
    let input = payload.text;
    let result = tokio::task::spawn_blocking(move || engine.classify(&input)).await??;

    info!(
        category = %result.category,
        confidence = result.confidence,
        method = result.method.as_str(),
        "prediction"
    );
    Ok(Json(result.into()))
}

async fn predict_batch(
    State(state): State<AppState>,
    Json(texts): Json<Vec<String>>,
) -> Result<Json<Vec<BatchPredictItem>>, ServerError> {
    let engine = state.engine.clone();
    let count = texts.len();
    let (texts, results) = tokio::task::spawn_blocking(move || {
        let results = BatchCoordinator::new(&engine).classify_batch_parallel(&texts);
        (texts, results)
    })
    .await?;

    let blank = texts.iter().filter(|t| text::is_blank(t)).count();
    info!(count, blank, "batch prediction");

    let items = texts
        .into_iter()
        .zip(results)
        .map(|(t, r)| BatchPredictItem::new(t, r))
        .collect();
    Ok(Json(items))
}
