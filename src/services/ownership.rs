// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ownership-chain authorization.
//!
//! Items and claims carry no owner field; every authenticated mutation
//! re-derives ownership by walking Item -> List -> owner at query time.
//! Failures are always reported as not-found, so a non-owner probing an
//! existing entity cannot distinguish "absent" from "not yours".

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Item, List};

/// Resolve a list if and only if it is owned by the given user.
pub async fn resolve_owned_list(
    db: &FirestoreDb,
    list_id: &str,
    owner_id: &str,
) -> Result<List> {
    match db.get_list(list_id).await? {
        Some(list) if list.owner_id == owner_id => Ok(list),
        _ => Err(AppError::NotFound(format!("List {} not found", list_id))),
    }
}

/// Resolve an item through its owning list (two-hop join).
///
/// Returns both the item and its list so callers don't repeat the lookup.
pub async fn resolve_owned_item(
    db: &FirestoreDb,
    item_id: &str,
    owner_id: &str,
) -> Result<(Item, List)> {
    let not_found = || AppError::NotFound(format!("Item {} not found", item_id));

    let item = db.get_item(item_id).await?.ok_or_else(not_found)?;
    match db.get_list(&item.list_id).await? {
        Some(list) if list.owner_id == owner_id => Ok((item, list)),
        _ => Err(not_found()),
    }
}
