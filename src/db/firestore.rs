// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, profiles, preferences)
//! - Lists (wishlists with public share identifiers)
//! - Items (wishlist entries)
//! - Claims (anonymous claims, keyed by item id)
//!
//! Also hosts the cascade-deletion orchestrators: ordered, individually
//! idempotent steps that delete children before parents so a mid-sequence
//! failure can be repaired by re-running the same operation.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Claim, Item, List, User};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Per-collection counts from a list cascade.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCascade {
    pub claims_deleted: usize,
    pub items_deleted: usize,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by lowercase-normalized email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.pop())
    }

    /// Create a user document. Fails with a conflict if the id is taken.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| map_insert_err(e, "User"))?;
        Ok(())
    }

    /// Update (upsert) a user document.
    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user document.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── List Operations ─────────────────────────────────────────

    /// Get a list by id.
    pub async fn get_list(&self, list_id: &str) -> Result<Option<List>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::LISTS)
            .obj()
            .one(list_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all lists owned by a user, newest first.
    pub async fn get_lists_for_owner(&self, owner_id: &str) -> Result<Vec<List>, AppError> {
        let owner_id = owner_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LISTS)
            .filter(move |q| q.field("owner_id").eq(owner_id.clone()))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a list by its public share identifier.
    pub async fn find_list_by_share_id(&self, share_id: &str) -> Result<Option<List>, AppError> {
        let share_id = share_id.to_string();
        let mut lists: Vec<List> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::LISTS)
            .filter(move |q| q.field("share_id").eq(share_id.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(lists.pop())
    }

    /// Create a list document. Fails with a conflict if the id is taken.
    pub async fn insert_list(&self, list: &List) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::LISTS)
            .document_id(&list.id)
            .object(list)
            .execute()
            .await
            .map_err(|e| map_insert_err(e, "List"))?;
        Ok(())
    }

    /// Update (upsert) a list document.
    pub async fn update_list(&self, list: &List) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::LISTS)
            .document_id(&list.id)
            .object(list)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a list document.
    pub async fn delete_list(&self, list_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::LISTS)
            .document_id(list_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Item Operations ─────────────────────────────────────────

    /// Get an item by id.
    pub async fn get_item(&self, item_id: &str) -> Result<Option<Item>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ITEMS)
            .obj()
            .one(item_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all items in a list, oldest first.
    pub async fn get_items_for_list(&self, list_id: &str) -> Result<Vec<Item>, AppError> {
        let list_id = list_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ITEMS)
            .filter(move |q| q.field("list_id").eq(list_id.clone()))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an item document. Fails with a conflict if the id is taken.
    pub async fn insert_item(&self, item: &Item) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::ITEMS)
            .document_id(&item.id)
            .object(item)
            .execute()
            .await
            .map_err(|e| map_insert_err(e, "Item"))?;
        Ok(())
    }

    /// Update (upsert) an item document.
    pub async fn update_item(&self, item: &Item) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ITEMS)
            .document_id(&item.id)
            .object(item)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an item document.
    pub async fn delete_item(&self, item_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ITEMS)
            .document_id(item_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Claim Operations ────────────────────────────────────────

    /// Get the claim on an item, if any.
    ///
    /// Claims are keyed by item id, so this is a direct document read.
    pub async fn get_claim_for_item(&self, item_id: &str) -> Result<Option<Claim>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CLAIMS)
            .obj()
            .one(item_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a claim by its public claim identifier.
    pub async fn find_claim_by_id(&self, claim_id: &str) -> Result<Option<Claim>, AppError> {
        let claim_id = claim_id.to_string();
        let mut claims: Vec<Claim> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CLAIMS)
            .filter(move |q| q.field("id").eq(claim_id.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(claims.pop())
    }

    /// Find a claim holding a given secret token (uniqueness probe).
    pub async fn find_claim_by_token(&self, token: &str) -> Result<Option<Claim>, AppError> {
        let token = token.to_string();
        let mut claims: Vec<Claim> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CLAIMS)
            .filter(move |q| q.field("secret_token").eq(token.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(claims.pop())
    }

    /// Create a claim with create-if-absent semantics.
    ///
    /// The document id is the claimed item id, so two concurrent claims on
    /// the same item race at the store, not in application code: the loser
    /// gets a conflict here.
    pub async fn insert_claim(&self, claim: &Claim) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::CLAIMS)
            .document_id(&claim.item_id)
            .object(claim)
            .execute()
            .await
            .map_err(|e| match e {
                firestore::errors::FirestoreError::DataConflictError(_) => {
                    AppError::Conflict("This item has already been claimed".to_string())
                }
                other => AppError::Database(other.to_string()),
            })?;
        Ok(())
    }

    /// Delete the claim on an item. Deleting an unclaimed item is a no-op.
    pub async fn delete_claim_for_item(&self, item_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::CLAIMS)
            .document_id(item_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Fetch claims for a set of items with bounded concurrency.
    pub async fn get_claims_for_items(
        &self,
        item_ids: &[String],
    ) -> Result<Vec<Claim>, AppError> {
        let claims: Vec<Result<Option<Claim>, AppError>> = stream::iter(item_ids.to_vec())
            .map(|item_id| async move { self.get_claim_for_item(&item_id).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        claims
            .into_iter()
            .collect::<Result<Vec<Option<Claim>>, AppError>>()
            .map(|found| found.into_iter().flatten().collect())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── Cascade Deletion ──────────────────────────────────────────

    /// Delete a list and everything under it.
    ///
    /// Order is strictly children before parents: claims, then items, then
    /// the list document. Each step is idempotent, so re-running after a
    /// mid-sequence failure completes the cascade instead of corrupting it.
    ///
    /// Returns the number of claims and items removed.
    pub async fn delete_list_data(&self, list_id: &str) -> Result<ListCascade, AppError> {
        // 1. Collect descendant identifiers
        let items = self.get_items_for_list(list_id).await?;
        let item_ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();

        // 2. Delete claims on those items (claim docs are keyed by item id)
        let claims = self.get_claims_for_items(&item_ids).await?;
        self.batch_delete(&claims, collections::CLAIMS, |claim: &Claim| {
            claim.item_id.clone()
        })
        .await?;
        tracing::debug!(list_id, count = claims.len(), "Deleted claims");

        // 3. Delete the items
        self.batch_delete(&items, collections::ITEMS, |item: &Item| item.id.clone())
            .await?;
        tracing::debug!(list_id, count = items.len(), "Deleted items");

        // 4. Delete the list itself
        self.delete_list(list_id).await?;

        tracing::info!(
            list_id,
            claims = claims.len(),
            items = items.len(),
            "List cascade complete"
        );

        Ok(ListCascade {
            claims_deleted: claims.len(),
            items_deleted: items.len(),
        })
    }

    /// Delete ALL data for a user.
    ///
    /// Walks the ownership chain: for each owned list, claims then items
    /// then the list; finally the user document itself.
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        let lists = self.get_lists_for_owner(user_id).await?;
        for list in &lists {
            let cascade = self.delete_list_data(&list.id).await?;
            deleted_count += cascade.claims_deleted + cascade.items_deleted + 1;
        }
        tracing::debug!(user_id, count = lists.len(), "Deleted lists");

        self.delete_user(user_id).await?;
        deleted_count += 1;

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}

/// Map a fluent-insert failure, turning a document-exists conflict into a
/// 409 instead of a 500.
fn map_insert_err(e: firestore::errors::FirestoreError, what: &str) -> AppError {
    match e {
        firestore::errors::FirestoreError::DataConflictError(_) => {
            AppError::Conflict(format!("{} already exists", what))
        }
        other => AppError::Database(other.to_string()),
    }
}
