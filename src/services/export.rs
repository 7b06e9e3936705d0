// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User data export.
//!
//! Read-only aggregation over the same ownership chain the cascade
//! deletion walks: user -> lists -> items -> claims. Claim secret tokens
//! are never included; they are only ever returned at claim creation.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{Claim, Item, List, User, UserPreferences};
use crate::time_utils::now_rfc3339;
use serde::Serialize;
use std::collections::HashMap;

/// Complete export document for one user.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub exported_at: String,
    pub user: ExportUser,
    pub lists: Vec<ExportList>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub preferences: UserPreferences,
    pub created_at: String,
    pub last_active: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportList {
    pub id: String,
    pub title: String,
    pub is_public: bool,
    pub share_id: String,
    pub created_at: String,
    pub items: Vec<ExportItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub price_cents: Option<u64>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub priority: crate::models::Priority,
    pub notes: Option<String>,
    pub created_at: String,
    pub claim: Option<ExportClaim>,
}

/// Claim as exported to the list owner: no secret token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportClaim {
    pub id: String,
    pub claimer_name: String,
    pub claimer_note: Option<String>,
    pub claimed_at: String,
}

/// Assemble the export document for a user.
pub async fn export_user_data(db: &FirestoreDb, user: &User) -> Result<ExportDocument> {
    let lists = db.get_lists_for_owner(&user.id).await?;

    let mut exported_lists = Vec::with_capacity(lists.len());
    for list in lists {
        let items = db.get_items_for_list(&list.id).await?;
        let item_ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();

        let mut claims_by_item: HashMap<String, Claim> = db
            .get_claims_for_items(&item_ids)
            .await?
            .into_iter()
            .map(|claim| (claim.item_id.clone(), claim))
            .collect();

        exported_lists.push(export_list(list, items, &mut claims_by_item));
    }

    tracing::info!(
        user_id = %user.id,
        lists = exported_lists.len(),
        "User data export assembled"
    );

    Ok(ExportDocument {
        exported_at: now_rfc3339(),
        user: ExportUser {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            preferences: user.preferences.clone(),
            created_at: user.created_at.clone(),
            last_active: user.last_active.clone(),
        },
        lists: exported_lists,
    })
}

fn export_list(
    list: List,
    items: Vec<Item>,
    claims_by_item: &mut HashMap<String, Claim>,
) -> ExportList {
    let items = items
        .into_iter()
        .map(|item| {
            let claim = claims_by_item.remove(&item.id).map(|claim| ExportClaim {
                id: claim.id,
                claimer_name: claim.claimer_name,
                claimer_note: claim.claimer_note,
                claimed_at: claim.claimed_at,
            });

            ExportItem {
                id: item.id,
                title: item.title,
                url: item.url,
                price_cents: item.price_cents,
                image_url: item.image_url,
                category: item.category,
                priority: item.priority,
                notes: item.notes,
                created_at: item.created_at,
                claim,
            }
        })
        .collect();

    ExportList {
        id: list.id,
        title: list.title,
        is_public: list.is_public,
        share_id: list.share_id,
        created_at: list.created_at,
        items,
    }
}
