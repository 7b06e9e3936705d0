// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use giftwell::config::Config;
use giftwell::db::FirestoreDb;
use giftwell::middleware::rate_limit::RateLimiter;
use giftwell::models::{Item, List, Priority, User, UserPreferences};
use giftwell::routes::create_router;
use giftwell::services::{tokens, MetadataService};
use giftwell::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let metadata_service =
        MetadataService::new(Duration::from_secs(1)).expect("metadata client");
    let auth_limiter = RateLimiter::new(
        config.auth_rate_limit_per_minute,
        Duration::from_secs(60),
    );
    let api_limiter = RateLimiter::new(
        config.api_rate_limit_per_minute,
        Duration::from_secs(60),
    );

    let state = Arc::new(AppState {
        config,
        db,
        metadata_service,
        auth_limiter,
        api_limiter,
    });

    (create_router(state.clone()), state)
}

/// Create a test JWT token for a user id.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    giftwell::middleware::auth::create_jwt(user_id, signing_key, 7).expect("Failed to create JWT")
}

/// Unique suffix for test isolation (emulator data persists across tests).
#[allow(dead_code)]
pub fn unique_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let since_the_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    format!("{}", since_the_epoch.as_nanos())
}

/// Insert a test user and return it.
#[allow(dead_code)]
pub async fn seed_user(db: &FirestoreDb) -> User {
    let now = "2025-01-01T00:00:00Z".to_string();
    let user = User {
        id: tokens::generate_document_id().unwrap(),
        email: format!("user-{}@example.com", unique_suffix()),
        password_hash: "$argon2id$test$hash".to_string(),
        display_name: "Test User".to_string(),
        preferences: UserPreferences::default(),
        created_at: now.clone(),
        updated_at: now.clone(),
        last_active: now,
    };
    db.insert_user(&user).await.unwrap();
    user
}

/// Insert a test list owned by `owner_id` and return it.
#[allow(dead_code)]
pub async fn seed_list(db: &FirestoreDb, owner_id: &str, is_public: bool) -> List {
    let now = "2025-01-01T00:00:00Z".to_string();
    let list = List {
        id: tokens::generate_document_id().unwrap(),
        owner_id: owner_id.to_string(),
        title: "Birthday list".to_string(),
        is_public,
        share_id: tokens::generate_share_id().unwrap(),
        created_at: now.clone(),
        updated_at: now,
    };
    db.insert_list(&list).await.unwrap();
    list
}

/// Insert a test item under `list_id` and return it.
#[allow(dead_code)]
pub async fn seed_item(db: &FirestoreDb, list_id: &str) -> Item {
    let now = "2025-01-01T00:00:00Z".to_string();
    let item = Item {
        id: tokens::generate_document_id().unwrap(),
        list_id: list_id.to_string(),
        title: "Wool socks".to_string(),
        url: Some("https://shop.example.com/socks".to_string()),
        price_cents: Some(1299),
        image_url: None,
        category: None,
        priority: Priority::Medium,
        notes: None,
        created_at: now.clone(),
        updated_at: now,
    };
    db.insert_item(&item).await.unwrap();
    item
}
