use crate::auth::{Access, authorize_ownership, scope_filter_for};
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::json::ValidatedJson;
use crate::models::project::{DeleteProjectRequest, Project, ProjectRequest, UpdateProjectRequest};
use crate::state::AppState;
use crate::utils::pagination::Page;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::json;
use std::collections::HashMap;

/// Lists every project, whoever owns it. Public browsing path.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Project>>, AppError> {
    let page = Page::from_query(&params, state.page_limits);
    let projects = state.projects.list(None, page).await?;
    Ok(Json(projects))
}

/// Lists the caller's own projects. The owner filter comes from the token,
/// there is no query parameter for it.
pub async fn list_my_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Project>>, AppError> {
    let page = Page::from_query(&params, state.page_limits);
    let owner = scope_filter_for(&user.claims);
    let projects = state.projects.list(Some(owner), page).await?;
    Ok(Json(projects))
}

/// Creates a project owned by the caller.
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<ProjectRequest>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let fields = payload.into_fields().map_err(AppError::Validation)?;

    // Owner is always the authenticated user, whatever the body said.
    let project = state.projects.insert(&fields, user.user_id()).await?;

    tracing::info!(project_id = project.id, user_id = user.user_id(), "Created project");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Replaces a project's fields. Owner only.
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<UpdateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    // Ownership first: strangers learn nothing about what a valid body is.
    let project = fetch_owned(&state, &user, payload.id).await?;
    let fields = payload.project.into_fields().map_err(AppError::Validation)?;

    let updated = state
        .projects
        .update(project.id, &fields, user.user_id())
        .await?
        // Deleted or reassigned between the check and the write.
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a project. Owner only.
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<DeleteProjectRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = fetch_owned(&state, &user, payload.id).await?;

    if !state
        .projects
        .delete_by_id(project.id, user.user_id())
        .await?
    {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    tracing::info!(project_id = project.id, user_id = user.user_id(), "Deleted project");

    Ok(Json(
        json!({ "message": format!("deleted project with id {}", project.id) }),
    ))
}

/// Loads a project and checks the caller owns it.
///
/// Missing is 404, someone else's (or nobody's) is the ownership error.
async fn fetch_owned(
    state: &AppState,
    user: &AuthenticatedUser,
    id: i32,
) -> Result<Project, AppError> {
    let project = state
        .projects
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    match authorize_ownership(&user.claims, project.user_id) {
        Access::Allow => Ok(project),
        Access::Deny => {
            tracing::warn!(
                project_id = id,
                user_id = user.user_id(),
                "Ownership check denied"
            );
            Err(AppError::Authorization)
        }
    }
}
