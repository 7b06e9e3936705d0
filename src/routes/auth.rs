// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and logout routes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, removal_cookie, session_cookie};
use crate::models::{User, UserPreferences};
use crate::response::{self, Message};
use crate::services::tokens;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// User profile as returned by the API. Never includes the password hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub preferences: UserPreferences,
    pub created_at: String,
    pub last_active: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            preferences: user.preferences,
            created_at: user.created_at,
            last_active: user.last_active,
        }
    }
}

#[derive(Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: String,
}

/// Register a new account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let email = payload.email.trim().to_lowercase();

    // Best-effort uniqueness check; the store has no unique index on email,
    // so a concurrent duplicate registration can slip through this window.
    if state.db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let now = now_rfc3339();
    let user = User {
        id: tokens::generate_document_id()?,
        email,
        password_hash: hash_password(&payload.password)?,
        display_name: payload.display_name,
        preferences: UserPreferences::default(),
        created_at: now.clone(),
        updated_at: now.clone(),
        last_active: now,
    };

    state.db.insert_user(&user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    let jar = jar.add(start_session(&state, &user.id)?);

    Ok((
        jar,
        response::created(UserEnvelope { user: user.into() }),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login with email and password, refreshing the session cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    let email = payload.email.trim().to_lowercase();

    let mut user = state
        .db
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(AppError::InvalidCredentials);
    }

    user.last_active = now_rfc3339();
    state.db.update_user(&user).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    let jar = jar.add(start_session(&state, &user.id)?);

    Ok((jar, response::ok(UserEnvelope { user: user.into() })).into_response())
}

/// Logout: clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let jar = jar.add(removal_cookie(&state.config));
    (jar, response::ok(Message::new("Logged out"))).into_response()
}

fn start_session(
    state: &AppState,
    user_id: &str,
) -> Result<axum_extra::extract::cookie::Cookie<'static>> {
    let jwt = create_jwt(
        user_id,
        &state.config.jwt_signing_key,
        state.config.session_ttl_days,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok(session_cookie(&state.config, jwt))
}

/// Hash a password with Argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored Argon2 hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored password hash invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
