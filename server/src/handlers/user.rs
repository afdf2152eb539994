use crate::error::AppError;
use crate::models::user::PublicUser;
use crate::state::AppState;
use crate::utils::pagination::Page;
use axum::{
    Json,
    extract::{Query, State},
};
use std::collections::HashMap;

/// Public user directory. Hashes never leave the store layer.
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let page = Page::from_query(&params, state.page_limits);
    Ok(Json(state.users.list(page).await?))
}
