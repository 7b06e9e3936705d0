// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wishlist item routes.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Item, Priority};
use crate::response::{self, Message};
use crate::services::metadata::ensure_https;
use crate::services::{ownership, tokens, UrlMetadata};
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/lists/{id}/items", get(get_items).post(create_item))
        .route("/items/{id}", patch(update_item).delete(delete_item))
        .route("/items/metadata", post(fetch_metadata))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub list_id: String,
    pub title: String,
    pub url: Option<String>,
    pub price_cents: Option<u64>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub priority: Priority,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            list_id: item.list_id,
            title: item.title,
            url: item.url,
            price_cents: item.price_cents,
            image_url: item.image_url,
            category: item.category,
            priority: item.priority,
            notes: item.notes,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ItemEnvelope {
    pub item: ItemResponse,
}

#[derive(Serialize)]
pub struct ItemsEnvelope {
    pub items: Vec<ItemResponse>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub url: Option<String>,
    pub price_cents: Option<u64>,
    pub image_url: Option<String>,
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,
    pub priority: Option<Priority>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// Create an item under an owned list.
async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<String>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    for url in [&payload.url, &payload.image_url].into_iter().flatten() {
        ensure_https(url)?;
    }

    let list = ownership::resolve_owned_list(&state.db, &list_id, &user.user_id).await?;

    let now = now_rfc3339();
    let item = Item {
        id: tokens::generate_document_id()?,
        list_id: list.id.clone(),
        title: payload.title,
        url: payload.url,
        price_cents: payload.price_cents,
        image_url: payload.image_url,
        category: payload.category,
        priority: payload.priority.unwrap_or_default(),
        notes: payload.notes,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.insert_item(&item).await?;
    tracing::info!(item_id = %item.id, list_id = %list.id, "Item created");

    Ok(response::created(ItemEnvelope { item: item.into() }))
}

/// List items of an owned list.
async fn get_items(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<String>,
) -> Result<Response> {
    let list = ownership::resolve_owned_list(&state.db, &list_id, &user.user_id).await?;

    let items = state.db.get_items_for_list(&list.id).await?;

    Ok(response::ok(ItemsEnvelope {
        items: items.into_iter().map(ItemResponse::from).collect(),
    }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub url: Option<String>,
    pub price_cents: Option<u64>,
    pub image_url: Option<String>,
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,
    pub priority: Option<Priority>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// Update an item. Authorization walks Item -> List -> owner.
async fn update_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(item_id): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    for url in [&payload.url, &payload.image_url].into_iter().flatten() {
        ensure_https(url)?;
    }

    let (mut item, _list) =
        ownership::resolve_owned_item(&state.db, &item_id, &user.user_id).await?;

    if let Some(title) = payload.title {
        item.title = title;
    }
    if let Some(url) = payload.url {
        item.url = Some(url);
    }
    if let Some(price_cents) = payload.price_cents {
        item.price_cents = Some(price_cents);
    }
    if let Some(image_url) = payload.image_url {
        item.image_url = Some(image_url);
    }
    if let Some(category) = payload.category {
        item.category = Some(category);
    }
    if let Some(priority) = payload.priority {
        item.priority = priority;
    }
    if let Some(notes) = payload.notes {
        item.notes = Some(notes);
    }
    item.updated_at = now_rfc3339();

    state.db.update_item(&item).await?;
    tracing::debug!(item_id = %item.id, "Item updated");

    Ok(response::ok(ItemEnvelope { item: item.into() }))
}

/// Delete an item and its claim, if any. Claim first, then the item.
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(item_id): Path<String>,
) -> Result<Response> {
    let (item, _list) = ownership::resolve_owned_item(&state.db, &item_id, &user.user_id).await?;

    state.db.delete_claim_for_item(&item.id).await?;
    state.db.delete_item(&item.id).await?;
    tracing::info!(item_id = %item.id, "Item deleted");

    Ok(response::ok(Message::new("Item deleted")))
}

#[derive(Deserialize)]
pub struct MetadataRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct MetadataEnvelope {
    pub metadata: UrlMetadata,
}

/// Fetch best-effort metadata for a product URL.
async fn fetch_metadata(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Json(payload): Json<MetadataRequest>,
) -> Result<Response> {
    ensure_https(&payload.url)?;

    let metadata = state.metadata_service.fetch(&payload.url).await?;

    Ok(response::ok(MetadataEnvelope { metadata }))
}
