// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wishlist routes: owner CRUD plus the anonymous public view.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Claim, List, Priority};
use crate::response::{self, Message};
use crate::services::{ownership, tokens};
use crate::time_utils::now_rfc3339;
use crate::AppState;

/// Bound on share-id regeneration when a collision is found.
const SHARE_ID_ATTEMPTS: usize = 5;

/// Owner routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/lists", get(get_lists).post(create_list))
        .route(
            "/lists/{id}",
            get(get_list).patch(update_list).delete(delete_list),
        )
}

/// Anonymous routes.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/public/lists/{share_id}", get(get_public_list))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub id: String,
    pub title: String,
    pub is_public: bool,
    pub share_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<List> for ListResponse {
    fn from(list: List) -> Self {
        Self {
            id: list.id,
            title: list.title,
            is_public: list.is_public,
            share_id: list.share_id,
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ListEnvelope {
    pub list: ListResponse,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    pub is_public: bool,
}

/// Create a list with a freshly generated unique share id.
async fn create_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateListRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // The owner must exist at creation time; a session may outlive its
    // account (JWTs are stateless and deletion cannot revoke them).
    if state.db.get_user(&user.user_id).await?.is_none() {
        return Err(AppError::Unauthorized);
    }

    let now = now_rfc3339();
    let list = List {
        id: tokens::generate_document_id()?,
        owner_id: user.user_id.clone(),
        title: payload.title,
        is_public: payload.is_public,
        share_id: unique_share_id(&state).await?,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.insert_list(&list).await?;
    tracing::info!(list_id = %list.id, owner_id = %list.owner_id, "List created");

    Ok(response::created(ListEnvelope { list: list.into() }))
}

/// Generate a share id no existing list uses.
async fn unique_share_id(state: &AppState) -> Result<String> {
    for attempt in 1..=SHARE_ID_ATTEMPTS {
        let share_id = tokens::generate_share_id()?;
        if state.db.find_list_by_share_id(&share_id).await?.is_none() {
            return Ok(share_id);
        }
        tracing::warn!(attempt, "Share id collision, regenerating");
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "Failed to generate a unique share id after {} attempts",
        SHARE_ID_ATTEMPTS
    )))
}

#[derive(Serialize)]
pub struct ListsEnvelope {
    pub lists: Vec<ListResponse>,
}

/// Get all lists owned by the current user.
async fn get_lists(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response> {
    let lists = state.db.get_lists_for_owner(&user.user_id).await?;

    Ok(response::ok(ListsEnvelope {
        lists: lists.into_iter().map(ListResponse::from).collect(),
    }))
}

/// Get one owned list.
async fn get_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<String>,
) -> Result<Response> {
    let list = ownership::resolve_owned_list(&state.db, &list_id, &user.user_id).await?;

    Ok(response::ok(ListEnvelope { list: list.into() }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub is_public: Option<bool>,
}

/// Update an owned list's title or visibility.
async fn update_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<String>,
    Json(payload): Json<UpdateListRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut list = ownership::resolve_owned_list(&state.db, &list_id, &user.user_id).await?;

    if let Some(title) = payload.title {
        list.title = title;
    }
    if let Some(is_public) = payload.is_public {
        list.is_public = is_public;
    }
    list.updated_at = now_rfc3339();

    state.db.update_list(&list).await?;
    tracing::debug!(list_id = %list.id, "List updated");

    Ok(response::ok(ListEnvelope { list: list.into() }))
}

/// Delete an owned list, cascading to its items and their claims.
async fn delete_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<String>,
) -> Result<Response> {
    let list = ownership::resolve_owned_list(&state.db, &list_id, &user.user_id).await?;

    state.db.delete_list_data(&list.id).await?;

    Ok(response::ok(Message::new("List deleted")))
}

// ─── Public View ─────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicItemResponse {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub price_cents: Option<u64>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub priority: Priority,
    pub notes: Option<String>,
    pub claimed: bool,
    pub claimer_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicListResponse {
    pub title: String,
    pub share_id: String,
    pub owner_name: String,
    pub items: Vec<PublicItemResponse>,
}

#[derive(Serialize)]
pub struct PublicListEnvelope {
    pub list: PublicListResponse,
}

/// Anonymous view of a shared list.
///
/// Private or unknown share ids both answer 404 so the share id namespace
/// leaks nothing. Claim status is included; claim tokens never are.
async fn get_public_list(
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<String>,
) -> Result<Response> {
    let not_found = || AppError::NotFound("List not found".to_string());

    let list = state
        .db
        .find_list_by_share_id(&share_id)
        .await?
        .ok_or_else(not_found)?;
    if !list.is_public {
        return Err(not_found());
    }

    let owner_name = state
        .db
        .get_user(&list.owner_id)
        .await?
        .map(|owner| owner.display_name)
        .unwrap_or_default();

    let items = state.db.get_items_for_list(&list.id).await?;
    let item_ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();

    let mut claims_by_item: HashMap<String, Claim> = state
        .db
        .get_claims_for_items(&item_ids)
        .await?
        .into_iter()
        .map(|claim| (claim.item_id.clone(), claim))
        .collect();

    let items = items
        .into_iter()
        .map(|item| {
            let claim = claims_by_item.remove(&item.id);
            PublicItemResponse {
                id: item.id,
                title: item.title,
                url: item.url,
                price_cents: item.price_cents,
                image_url: item.image_url,
                category: item.category,
                priority: item.priority,
                notes: item.notes,
                claimed: claim.is_some(),
                claimer_name: claim.map(|c| c.claimer_name),
            }
        })
        .collect();

    Ok(response::ok(PublicListEnvelope {
        list: PublicListResponse {
            title: list.title,
            share_id: list.share_id,
            owner_name,
            items,
        },
    }))
}
