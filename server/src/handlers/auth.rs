use crate::auth::{hash_password, issue_token, verify_dummy, verify_password};
use crate::db::StoreError;
use crate::error::AppError;
use crate::middleware::json::ValidatedJson;
use crate::models::user::{Credentials, LoginResponse, PublicUser};
use crate::state::AppState;
use crate::utils::validation::{validate_credentials, validate_username};
use axum::{Json, extract::State, http::StatusCode};

/// Creates an account.
///
/// Usernames are first-come first-served: a taken name is a 409, never an
/// update of the existing account. The response carries the public fields
/// only, the hash stays in the store.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<Credentials>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    validate_credentials(&payload.username, &payload.password).map_err(AppError::Validation)?;
    validate_username(&payload.username).map_err(AppError::Validation)?;

    // 1. Check if user already exists
    if state
        .users
        .find_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    // 2. Hash password off the async workers, argon2 is slow on purpose
    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))??;

    // 3. Create user. A concurrent signup for the same name loses on the
    // unique index and gets the same 409.
    let user = state
        .users
        .insert(&payload.username, &password_hash)
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation => AppError::Conflict("Username already taken".to_string()),
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, "Registered new user");

    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

/// Exchanges a username and password for a bearer token.
///
/// Unknown usernames and wrong passwords produce the exact same 401 so the
/// endpoint can't be used to probe which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_credentials(&payload.username, &payload.password).map_err(AppError::Validation)?;

    // 1. Fetch user
    let user = state.users.find_by_username(&payload.username).await?;

    // 2. Verify password. Unknown users still pay for a full argon2 verify
    // against a dummy hash, so response time doesn't give them away.
    let password = payload.password;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let matches = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => verify_dummy(&password),
    })
    .await
    .map_err(|e| AppError::Internal(format!("verify task failed: {e}")))?;

    let user = match user {
        Some(user) if matches => user,
        Some(_) => {
            tracing::warn!(username = %payload.username, "Login failed: wrong password");
            return Err(AppError::Authentication);
        }
        None => {
            tracing::warn!(username = %payload.username, "Login failed: unknown user");
            return Err(AppError::Authentication);
        }
    };

    // 3. Issue token. Nothing in this service grants admin.
    let token = issue_token(user.id, false, &state.security)?;

    Ok(Json(LoginResponse { token }))
}
