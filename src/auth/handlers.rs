use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, LoginResponse, MessageResponse, PublicUser},
        extractors::AuthUser,
        jwt::JwtKeys,
        password,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/protected", get(protected))
}

/// Pulls both fields out of the body. Email is checked before password.
fn credentials(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(String, String), AppError> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let email = body.email.ok_or(AppError::MissingField("email"))?;
    let password = body.password.ok_or(AppError::MissingField("password"))?;
    Ok((email, password))
}

// argon2 is deliberately slow; keep it off the async workers.
async fn hash_blocking(plain: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(hash)
}

async fn verify_blocking(plain: String, hash: String) -> Result<bool, AppError> {
    let ok = tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(ok)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let (email, password) = credentials(payload)?;

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "user already exists");
        return Err(AppError::UserExists);
    }

    let hash = hash_blocking(password).await?;
    let user = state.users.create(&email, &hash).await.map_err(|e| {
        warn!(email = %email, error = %e, "create user failed");
        AppError::from(e)
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(MessageResponse {
        msg: "User created successfully".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = credentials(payload)?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        tokio::task::spawn_blocking(move || password::verify_dummy(&password))
            .await
            .map_err(anyhow::Error::from)?;
        return Err(AppError::InvalidCredentials);
    };

    if !verify_blocking(password, user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
    }))
}

#[instrument(skip(state))]
pub async fn protected(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "token subject has no user");
        AppError::UserNotFound
    })?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}
