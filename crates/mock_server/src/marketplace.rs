use api_types::{institution::Institution, reward::Reward};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ApiFailure, AppState};

/// Public catalog: active rewards only.
pub(crate) async fn rewards(State(state): State<AppState>) -> Json<Vec<Reward>> {
    state.with_data(|data| Json(data.rewards.iter().filter(|r| r.active).cloned().collect()))
}

pub(crate) async fn reward(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Reward>, ApiFailure> {
    state
        .with_data(|data| data.rewards.iter().find(|r| r.id == id).cloned())
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("unknown_reward"))
}

pub(crate) async fn institutions(State(state): State<AppState>) -> Json<Vec<Institution>> {
    state.with_data(|data| Json(data.institutions.clone()))
}
