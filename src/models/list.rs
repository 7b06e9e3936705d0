// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wishlist model for storage and API.

use serde::{Deserialize, Serialize};

/// Wishlist stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    /// Random URL-safe identifier (also used as document ID)
    pub id: String,
    /// Owning user id; authorization always re-derives ownership from this
    pub owner_id: String,
    /// List title
    pub title: String,
    /// Whether anonymous visitors may view the list and claim items
    pub is_public: bool,
    /// Globally unique URL-safe share identifier for the public view
    pub share_id: String,
    /// When the list was created
    pub created_at: String,
    /// Last modification
    pub updated_at: String,
}
