// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for user data export.
//!
//! These tests require the Firestore emulator to be running.
//! Run with: FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test --test export_tests

use giftwell::services::claims::{create_claim, NewClaim};
use giftwell::services::export::export_user_data;

mod common;

#[tokio::test]
async fn test_export_walks_the_full_ownership_chain() {
    require_emulator!();
    let db = common::test_db().await;

    let user = common::seed_user(&db).await;
    let list = common::seed_list(&db, &user.id, true).await;
    let item_claimed = common::seed_item(&db, &list.id).await;
    let item_open = common::seed_item(&db, &list.id).await;

    create_claim(
        &db,
        NewClaim {
            item_id: item_claimed.id.clone(),
            claimer_name: "Al".to_string(),
            claimer_note: Some("wrapping it myself".to_string()),
        },
    )
    .await
    .unwrap();

    let export = export_user_data(&db, &user).await.unwrap();

    assert_eq!(export.user.id, user.id);
    assert_eq!(export.lists.len(), 1);
    assert_eq!(export.lists[0].items.len(), 2);

    let claimed = export.lists[0]
        .items
        .iter()
        .find(|i| i.id == item_claimed.id)
        .unwrap();
    assert_eq!(
        claimed.claim.as_ref().unwrap().claimer_name,
        "Al".to_string()
    );

    let open = export.lists[0]
        .items
        .iter()
        .find(|i| i.id == item_open.id)
        .unwrap();
    assert!(open.claim.is_none());
}

#[tokio::test]
async fn test_export_excludes_other_users_lists() {
    require_emulator!();
    let db = common::test_db().await;

    let user = common::seed_user(&db).await;
    common::seed_list(&db, &user.id, true).await;

    let other = common::seed_user(&db).await;
    common::seed_list(&db, &other.id, true).await;

    let export = export_user_data(&db, &user).await.unwrap();
    assert_eq!(export.lists.len(), 1);
}

#[tokio::test]
async fn test_export_json_is_token_free() {
    require_emulator!();
    let db = common::test_db().await;

    let user = common::seed_user(&db).await;
    let list = common::seed_list(&db, &user.id, true).await;
    let item = common::seed_item(&db, &list.id).await;

    let claim = create_claim(
        &db,
        NewClaim {
            item_id: item.id.clone(),
            claimer_name: "Al".to_string(),
            claimer_note: None,
        },
    )
    .await
    .unwrap();

    let export = export_user_data(&db, &user).await.unwrap();
    let json = serde_json::to_string(&export).unwrap();

    assert!(!json.contains(&claim.secret_token));
    assert!(!json.contains("secretToken"));
    assert!(!json.contains("password"));
}
