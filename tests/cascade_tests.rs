// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Integration tests for cascade deletion.
//!
//! These tests require the Firestore emulator to be running.
//! Run with: FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test --test cascade_tests

use giftwell::services::claims::{create_claim, NewClaim};

mod common;

#[tokio::test]
async fn test_list_cascade_removes_items_and_claims() {
    require_emulator!();
    let db = common::test_db().await;

    let user = common::seed_user(&db).await;
    let list = common::seed_list(&db, &user.id, true).await;

    let item_a = common::seed_item(&db, &list.id).await;
    let item_b = common::seed_item(&db, &list.id).await;
    let item_c = common::seed_item(&db, &list.id).await;

    // Claim two of the three items
    for item_id in [&item_a.id, &item_b.id] {
        create_claim(
            &db,
            NewClaim {
                item_id: item_id.to_string(),
                claimer_name: "Al".to_string(),
                claimer_note: None,
            },
        )
        .await
        .unwrap();
    }

    let cascade = db.delete_list_data(&list.id).await.unwrap();
    assert_eq!(cascade.items_deleted, 3);
    assert_eq!(cascade.claims_deleted, 2);

    // Zero items with that list id, zero claims on those items
    assert!(db.get_items_for_list(&list.id).await.unwrap().is_empty());
    for item_id in [&item_a.id, &item_b.id, &item_c.id] {
        assert!(db.get_item(item_id).await.unwrap().is_none());
        assert!(db.get_claim_for_item(item_id).await.unwrap().is_none());
    }
    assert!(db.get_list(&list.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_cascade_is_rerunnable() {
    require_emulator!();
    let db = common::test_db().await;

    let user = common::seed_user(&db).await;
    let list = common::seed_list(&db, &user.id, true).await;
    common::seed_item(&db, &list.id).await;

    db.delete_list_data(&list.id).await.unwrap();

    // Every step is idempotent: re-running the cascade on already-deleted
    // data must succeed and delete nothing.
    let cascade = db.delete_list_data(&list.id).await.unwrap();
    assert_eq!(cascade.items_deleted, 0);
    assert_eq!(cascade.claims_deleted, 0);
}

#[tokio::test]
async fn test_user_cascade_removes_everything_owned() {
    require_emulator!();
    let db = common::test_db().await;

    let user = common::seed_user(&db).await;
    let list_a = common::seed_list(&db, &user.id, true).await;
    let list_b = common::seed_list(&db, &user.id, false).await;

    let item_a = common::seed_item(&db, &list_a.id).await;
    let item_b = common::seed_item(&db, &list_b.id).await;

    create_claim(
        &db,
        NewClaim {
            item_id: item_a.id.clone(),
            claimer_name: "Al".to_string(),
            claimer_note: None,
        },
    )
    .await
    .unwrap();

    // user + 2 lists + 2 items + 1 claim
    let deleted = db.delete_user_data(&user.id).await.unwrap();
    assert_eq!(deleted, 6);

    assert!(db.get_user(&user.id).await.unwrap().is_none());
    for list_id in [&list_a.id, &list_b.id] {
        assert!(db.get_list(list_id).await.unwrap().is_none());
    }
    for item_id in [&item_a.id, &item_b.id] {
        assert!(db.get_item(item_id).await.unwrap().is_none());
        assert!(db.get_claim_for_item(item_id).await.unwrap().is_none());
    }
    assert!(db.get_lists_for_owner(&user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_user_cascade_leaves_other_users_untouched() {
    require_emulator!();
    let db = common::test_db().await;

    let victim = common::seed_user(&db).await;
    let victim_list = common::seed_list(&db, &victim.id, true).await;
    let victim_item = common::seed_item(&db, &victim_list.id).await;

    let bystander = common::seed_user(&db).await;
    let bystander_list = common::seed_list(&db, &bystander.id, true).await;
    let bystander_item = common::seed_item(&db, &bystander_list.id).await;

    db.delete_user_data(&victim.id).await.unwrap();

    // Victim data gone
    assert!(db.get_list(&victim_list.id).await.unwrap().is_none());
    assert!(db.get_item(&victim_item.id).await.unwrap().is_none());

    // Bystander data intact
    assert!(db.get_user(&bystander.id).await.unwrap().is_some());
    assert!(db.get_list(&bystander_list.id).await.unwrap().is_some());
    assert!(db.get_item(&bystander_item.id).await.unwrap().is_some());
}
