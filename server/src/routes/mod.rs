use crate::handlers::{
    auth::{login, register},
    health::health_check,
    project::{create_project, delete_project, list_my_projects, list_projects, update_project},
    user::list_users,
};
use crate::state::AppState;
use axum::{Router, routing::get, routing::post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Every handler under here takes an AuthenticatedUser, so a bad or
    // missing token is a 401 before any handler code runs.
    let authorized_routes = Router::new().route(
        "/projects",
        get(list_my_projects)
            .post(create_project)
            .put(update_project)
            .delete(delete_project),
    );

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/users", get(list_users))
        .route("/projects", get(list_projects))
        .nest("/authorized", authorized_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
