//! Form options endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::dto::OptionsResponse;
use crate::state::AppState;

/// GET /api/options - Length bounds and backend choices.
pub async fn options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse::new(&state.config.token_env))
}
