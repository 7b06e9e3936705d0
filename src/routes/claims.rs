// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Anonymous claim routes.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::Claim;
use crate::response::{self, Message};
use crate::services::claims::{self, NewClaim};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/claims", post(create_claim))
        .route("/claims/{id}", delete(retract_claim))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub item_id: String,
    #[validate(length(min = 1, max = 100, message = "Claimer name must be 1-100 characters"))]
    pub claimer_name: String,
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub claimer_note: Option<String>,
}

/// Claim as returned from creation: the only response that ever carries
/// the secret token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCreatedResponse {
    pub id: String,
    pub item_id: String,
    pub claimer_name: String,
    pub secret_token: String,
    pub claimed_at: String,
}

impl From<Claim> for ClaimCreatedResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id,
            item_id: claim.item_id,
            claimer_name: claim.claimer_name,
            secret_token: claim.secret_token,
            claimed_at: claim.claimed_at,
        }
    }
}

#[derive(Serialize)]
pub struct ClaimEnvelope {
    pub claim: ClaimCreatedResponse,
}

/// Create an anonymous claim on a public list's item.
async fn create_claim(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateClaimRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let claim = claims::create_claim(
        &state.db,
        NewClaim {
            item_id: payload.item_id,
            claimer_name: payload.claimer_name,
            claimer_note: payload.claimer_note,
        },
    )
    .await?;

    Ok(response::created(ClaimEnvelope {
        claim: claim.into(),
    }))
}

#[derive(Deserialize)]
pub struct RetractParams {
    pub token: Option<String>,
}

/// Retract a claim. The secret token is the entire authorization.
async fn retract_claim(
    State(state): State<Arc<AppState>>,
    Path(claim_id): Path<String>,
    Query(params): Query<RetractParams>,
) -> Result<Response> {
    let token = params
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Missing claim token".to_string()))?;

    claims::retract_claim(&state.db, &claim_id, &token).await?;

    Ok(response::ok(Message::new("Claim removed")))
}
