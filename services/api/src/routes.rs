//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{
        AuthResponse, LoginRequest, SaveProgressRequest, SignupRequest, UpdateNameRequest,
        UserResponse,
    },
    repositories::DuplicateUsername,
    state::AppState,
    validation,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/logout", post(logout))
        .route("/profile/name", put(update_adventurer_name))
        .route("/progress", post(save_progress))
        .route("/progress/latest", get(load_latest_progress))
        .route("/progress/:id", delete(delete_progress))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/stories", get(list_stories))
        .route("/stories/:id", get(get_story))
        .route("/stories/:id/chapters", get(get_story_chapters))
        .route("/stories/:id/chapters/:number", get(get_chapter))
        .route("/items/:id", get(get_item))
        .route("/enemies/:id", get(get_enemy))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "inkbound-api"
    }))
}

/// Issue a session token and persist it as the user's sole current token
///
/// The `set_token` write completes before the token is handed back, so an
/// immediately following authenticated request already passes the gate.
async fn issue_session(
    state: &AppState,
    user_id: Uuid,
    username: &str,
) -> Result<String, ApiError> {
    let token = state.token_service.issue(user_id, username).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::InternalServerError
    })?;

    state
        .user_repository
        .set_token(user_id, Some(&token))
        .await
        .map_err(|e| {
            error!("Failed to store session token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(token)
}

/// Sign-up endpoint
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Sign-up attempt for username: {}", payload.username);

    validation::validate_username(&payload.username).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;
    validation::validate_adventurer_name(&payload.adventurer_name).map_err(ApiError::BadRequest)?;

    let user = match state.user_repository.create(&payload).await {
        Ok(user) => user,
        Err(e) if e.downcast_ref::<DuplicateUsername>().is_some() => {
            // Kept generic so sign-up cannot be used to probe for accounts
            return Err(ApiError::BadRequest("unable to create account".to_string()));
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            return Err(ApiError::InternalServerError);
        }
    };

    let token = issue_session(&state, user.id, &user.username).await?;

    let response = AuthResponse {
        user: UserResponse::from(user),
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_service.token_expiry(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login endpoint
///
/// Unknown username and wrong password resolve to the same error.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for username: {}", payload.username);

    let user = state
        .user_repository
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::InvalidCredential)?;

    let password_ok = state
        .user_repository
        .verify_password(&user, &payload.password)
        .await
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !password_ok {
        return Err(ApiError::InvalidCredential);
    }

    // Supersedes any previously issued token for this account
    let token = issue_session(&state, user.id, &user.username).await?;

    let response = AuthResponse {
        user: UserResponse::from(user),
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_service.token_expiry(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Logout endpoint
///
/// Clears the stored token; idempotent.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Logout for user: {}", auth.id);

    state
        .user_repository
        .set_token(auth.id, None)
        .await
        .map_err(|e| {
            error!("Failed to clear session token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({ "message": "logged out" })))
}

/// Update the caller's adventurer name
pub async fn update_adventurer_name(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<UpdateNameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_adventurer_name(&payload.adventurer_name).map_err(ApiError::BadRequest)?;

    let user = state
        .user_repository
        .update_adventurer_name(auth.id, &payload.adventurer_name)
        .await
        .map_err(|e| {
            error!("Failed to update adventurer name: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(UserResponse::from(user)))
}

/// Create a save slot for the caller
pub async fn save_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<SaveProgressRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_save_name(&payload.save_name).map_err(ApiError::BadRequest)?;

    let progress = state
        .progress_repository
        .create(auth.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to save progress: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(progress)))
}

/// Load the caller's most recent save
pub async fn load_latest_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let progress = state
        .progress_repository
        .find_latest(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to load progress: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(progress))
}

/// Delete one of the caller's save slots
///
/// A slot that does not exist and a slot owned by someone else answer the
/// same way.
pub async fn delete_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .progress_repository
        .delete(auth.id, id)
        .await
        .map_err(|e| {
            error!("Failed to delete progress: {}", e);
            ApiError::InternalServerError
        })?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({ "message": "save deleted" })))
}

/// List all stories
pub async fn list_stories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stories = state.content_repository.list_stories().await.map_err(|e| {
        error!("Failed to list stories: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(stories))
}

/// Get a story by ID
pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let story = state
        .content_repository
        .find_story(id)
        .await
        .map_err(|e| {
            error!("Failed to get story: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(story))
}

/// List the chapters of a story
pub async fn get_story_chapters(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let chapters = state
        .content_repository
        .chapters_for_story(id)
        .await
        .map_err(|e| {
            error!("Failed to list chapters: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(chapters))
}

/// Get a chapter by story and chapter number
pub async fn get_chapter(
    State(state): State<AppState>,
    Path((id, number)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let chapter = state
        .content_repository
        .find_chapter(id, number)
        .await
        .map_err(|e| {
            error!("Failed to get chapter: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(chapter))
}

/// Get an item by ID
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .content_repository
        .find_item(id)
        .await
        .map_err(|e| {
            error!("Failed to get item: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(item))
}

/// Get an enemy by ID
pub async fn get_enemy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let enemy = state
        .content_repository
        .find_enemy(id)
        .await
        .map_err(|e| {
            error!("Failed to get enemy: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(enemy))
}
