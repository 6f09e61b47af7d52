use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthenticatedUser,
    models::{
        request::validate_topic, HistoryEntry, RecommendationRequest, RecommendationResult,
        TopicResult,
    },
};

use super::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub user_id: String,
    pub history: Vec<HistoryEntry>,
}

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Full recommendation for the calling user
///
/// The body is validated before anything reaches the backend; a malformed body
/// is reported as a validation error rather than axum's plain-text rejection.
pub async fn recommend(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResult>> {
    let Json(request) = body.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    request.validate()?;

    tracing::info!(user_id = %user.user_id, "Full recommendation requested");

    let result = state
        .with_deadline(state.pipeline.run_full_recommendation(&request, &user.user_id))
        .await?;

    Ok(Json(result))
}

/// Quick recommendation for a free-text topic
pub async fn recommend_by_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> AppResult<Json<TopicResult>> {
    let topic = validate_topic(&topic)?;

    tracing::info!(topic = %topic, "Topic recommendation requested");

    let result = state
        .with_deadline(state.pipeline.run_topic_query(topic))
        .await?;

    Ok(Json(result))
}

/// Recommendation history of a user, oldest first
pub async fn get_history(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<HistoryResponse>> {
    user.ensure_can_read(&user_id)?;

    let history = state.pipeline.list_history(&user_id).await?;

    Ok(Json(HistoryResponse { user_id, history }))
}
