// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Anonymous claim protocol.
//!
//! Claims are a bearer-capability design: the secret token handed back at
//! creation is the only credential for retraction. It is returned exactly
//! once and no read path ever exposes it again.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::Claim;
use crate::services::tokens;
use crate::time_utils::now_rfc3339;
use subtle::ConstantTimeEq;

/// Bound on secret-token regeneration when a collision is found.
const TOKEN_GENERATION_ATTEMPTS: usize = 5;

/// Validated input for claim creation.
pub struct NewClaim {
    pub item_id: String,
    pub claimer_name: String,
    pub claimer_note: Option<String>,
}

/// Create an anonymous claim on an item of a public list.
///
/// Preconditions checked in order: the item exists (404), its list is
/// public (403), and the item is unclaimed (409). The unclaimed pre-check
/// is best-effort; the insert itself uses create-if-absent semantics keyed
/// by item id, so a concurrent duplicate still loses with a conflict.
pub async fn create_claim(db: &FirestoreDb, new_claim: NewClaim) -> Result<Claim> {
    let item = db
        .get_item(&new_claim.item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", new_claim.item_id)))?;

    let list = db
        .get_list(&item.list_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", new_claim.item_id)))?;

    if !list.is_public {
        return Err(AppError::Forbidden("This list is not public".to_string()));
    }

    if db.get_claim_for_item(&item.id).await?.is_some() {
        return Err(AppError::Conflict(
            "This item has already been claimed".to_string(),
        ));
    }

    let claim = Claim {
        id: tokens::generate_document_id()?,
        item_id: item.id.clone(),
        claimer_name: new_claim.claimer_name,
        claimer_note: new_claim.claimer_note,
        secret_token: unique_secret_token(db).await?,
        claimed_at: now_rfc3339(),
    };

    db.insert_claim(&claim).await?;

    tracing::info!(
        claim_id = %claim.id,
        item_id = %claim.item_id,
        list_id = %list.id,
        "Claim created"
    );

    Ok(claim)
}

/// Generate a secret token that no existing claim holds.
async fn unique_secret_token(db: &FirestoreDb) -> Result<String> {
    for attempt in 1..=TOKEN_GENERATION_ATTEMPTS {
        let token = tokens::generate_secret_token()?;
        if db.find_claim_by_token(&token).await?.is_none() {
            return Ok(token);
        }
        tracing::warn!(attempt, "Secret token collision, regenerating");
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "Failed to generate a unique claim token after {} attempts",
        TOKEN_GENERATION_ATTEMPTS
    )))
}

/// Retract a claim given its id and the bearer secret.
///
/// Possession of the token is the entire authorization; no session or
/// ownership check applies. The comparison is constant-time.
pub async fn retract_claim(db: &FirestoreDb, claim_id: &str, token: &str) -> Result<()> {
    let claim = db
        .find_claim_by_id(claim_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Claim {} not found", claim_id)))?;

    let token_matches: bool = claim
        .secret_token
        .as_bytes()
        .ct_eq(token.as_bytes())
        .into();
    if !token_matches {
        return Err(AppError::Forbidden("Invalid claim token".to_string()));
    }

    db.delete_claim_for_item(&claim.item_id).await?;

    tracing::info!(
        claim_id = %claim.id,
        item_id = %claim.item_id,
        "Claim retracted"
    );

    Ok(())
}
