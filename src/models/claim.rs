// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Anonymous claim model for storage.

use serde::{Deserialize, Serialize};

/// Anonymous claim on a wishlist item, stored in Firestore.
///
/// The document is keyed by `item_id`, so the store itself enforces
/// at-most-one claim per item: a second insert for the same item fails
/// with a conflict instead of silently overwriting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Public claim identifier, used as the retraction handle
    pub id: String,
    /// Claimed item id (also used as document ID)
    pub item_id: String,
    /// Name the anonymous claimer supplied
    pub claimer_name: String,
    /// Optional note from the claimer
    pub claimer_note: Option<String>,
    /// Bearer secret, returned exactly once at creation and never again
    /// through any read path
    pub secret_token: String,
    /// When the claim was made
    pub claimed_at: String,
}
