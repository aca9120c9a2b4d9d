//! Learning handlers: corrections, deletions, recompute and suggestions.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use bidcraft::{CorrectionRecord, LearningSummary, LineItemSuggestion};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for logging a correction.
#[derive(Deserialize)]
pub struct CorrectionRequest {
    pub item: String,
    pub original_cost: f64,
    pub corrected_cost: f64,
}

/// Response after logging a correction.
#[derive(Serialize)]
pub struct CorrectionResponse {
    pub item: String,
    pub record: CorrectionRecord,
    /// Corrections now on record for the item.
    pub corrections: usize,
}

/// Request body for logging a deletion.
#[derive(Deserialize)]
pub struct DeletionRequest {
    pub item: String,
}

/// Response after logging a deletion.
#[derive(Serialize)]
pub struct DeletionResponse {
    pub item: String,
    pub deletions: u64,
    pub flagged: bool,
}

/// Response after a recompute.
#[derive(Serialize)]
pub struct RecomputeResponse {
    pub updated: usize,
    pub suggestions: Vec<LineItemSuggestion>,
}

#[derive(Deserialize)]
pub struct FlaggedQuery {
    pub threshold: Option<u64>,
}

#[derive(Serialize)]
pub struct FlaggedItem {
    pub item: String,
    pub deletions: u64,
}

#[derive(Serialize)]
pub struct FlaggedResponse {
    pub threshold: u64,
    pub items: Vec<FlaggedItem>,
}

/// POST /api/corrections
pub async fn record_correction(
    State(state): State<AppState>,
    Json(req): Json<CorrectionRequest>,
) -> Result<(StatusCode, Json<CorrectionResponse>), ApiError> {
    let mut store = state.store.write().await;
    let record = store.record_correction(&req.item, req.original_cost, req.corrected_cost)?;
    let corrections = store.corrections_for(&req.item).len();

    Ok((
        StatusCode::CREATED,
        Json(CorrectionResponse {
            item: req.item,
            record,
            corrections,
        }),
    ))
}

/// POST /api/deletions
pub async fn record_deletion(
    State(state): State<AppState>,
    Json(req): Json<DeletionRequest>,
) -> Result<(StatusCode, Json<DeletionResponse>), ApiError> {
    let mut store = state.store.write().await;
    let deletions = store.record_deletion(&req.item)?;
    let flagged = store.is_flagged(&req.item);

    Ok((
        StatusCode::CREATED,
        Json(DeletionResponse {
            item: req.item,
            deletions,
            flagged,
        }),
    ))
}

/// POST /api/recompute
pub async fn recompute(State(state): State<AppState>) -> Result<Json<RecomputeResponse>, ApiError> {
    let mut store = state.store.write().await;
    let updated = store.recompute_cost_memory()?;

    Ok(Json(RecomputeResponse {
        updated,
        suggestions: store.suggest_line_items(),
    }))
}

/// GET /api/suggestions
pub async fn get_suggestions(State(state): State<AppState>) -> Json<Vec<LineItemSuggestion>> {
    let store = state.store.read().await;
    Json(store.suggest_line_items())
}

/// GET /api/flagged
pub async fn get_flagged(
    State(state): State<AppState>,
    Query(query): Query<FlaggedQuery>,
) -> Result<Json<FlaggedResponse>, ApiError> {
    if query.threshold == Some(0) {
        return Err(ApiError::BadRequest(
            "threshold must be at least 1".to_string(),
        ));
    }

    let store = state.store.read().await;
    let threshold = query.threshold.unwrap_or(store.config().flag_threshold);
    let items = store
        .flagged_items_at(threshold)
        .into_iter()
        .map(|item| FlaggedItem {
            deletions: store.deletion_count(&item),
            item,
        })
        .collect();

    Ok(Json(FlaggedResponse { threshold, items }))
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<LearningSummary> {
    let store = state.store.read().await;
    Json(store.summary())
}
