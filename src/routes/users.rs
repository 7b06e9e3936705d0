// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: profile, preferences, deletion, export.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{removal_cookie, AuthUser};
use crate::models::UserPreferences;
use crate::response::{self, Message};
use crate::routes::auth::{verify_password, UserEnvelope, UserResponse};
use crate::services::export;
use crate::time_utils::now_rfc3339;
use crate::AppState;

/// Literal the client must echo to confirm account deletion.
const DELETE_CONFIRMATION: &str = "DELETE";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/me", get(get_me).patch(update_me))
        .route("/users/delete", delete(delete_account))
        .route("/users/export", get(export_data))
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(response::ok(UserEnvelope {
        user: UserResponse::from(profile),
    }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: Option<String>,
    pub preferences: Option<UserPreferences>,
}

/// Update display name and/or preferences.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    if let Some(display_name) = payload.display_name {
        profile.display_name = display_name;
    }
    if let Some(preferences) = payload.preferences {
        profile.preferences = preferences;
    }
    profile.updated_at = now_rfc3339();

    state.db.update_user(&profile).await?;
    tracing::debug!(user_id = %profile.id, "Profile updated");

    Ok(response::ok(UserEnvelope {
        user: UserResponse::from(profile),
    }))
}

#[derive(Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
    pub confirmation: String,
}

/// Delete the account and all associated data.
///
/// Requires re-authentication with the current password plus the literal
/// confirmation string, then cascades lists -> items -> claims -> user and
/// clears the session cookie.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<Response> {
    if payload.confirmation != DELETE_CONFIRMATION {
        return Err(AppError::Validation(format!(
            "Confirmation must be the literal string \"{}\"",
            DELETE_CONFIRMATION
        )));
    }

    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    if !verify_password(&payload.password, &profile.password_hash)? {
        tracing::warn!(user_id = %profile.id, "Account deletion rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = %profile.id, "User-initiated account deletion");
    let deleted_count = state.db.delete_user_data(&profile.id).await?;
    tracing::info!(user_id = %profile.id, deleted_count, "Account deleted");

    let jar = jar.add(removal_cookie(&state.config));

    Ok((
        jar,
        response::ok(Message::new("Account and all associated data deleted")),
    )
        .into_response())
}

/// Export all of the user's data as one nested document.
async fn export_data(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let document = export::export_user_data(&state.db, &profile).await?;

    Ok(response::ok(document))
}
