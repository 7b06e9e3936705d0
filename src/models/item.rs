// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wishlist item model for storage and API.

use serde::{Deserialize, Serialize};

/// Item priority. Defaults to `Medium` when unspecified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Wishlist item stored in Firestore.
///
/// Items carry no owner reference; ownership is always derived through the
/// parent list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Random URL-safe identifier (also used as document ID)
    pub id: String,
    /// Parent list id
    pub list_id: String,
    /// Item title
    pub title: String,
    /// Product URL (HTTPS only)
    pub url: Option<String>,
    /// Price in the smallest currency unit
    pub price_cents: Option<u64>,
    /// Product image URL
    pub image_url: Option<String>,
    /// Free-form category label
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Free-form notes from the list owner
    pub notes: Option<String>,
    /// When the item was created
    pub created_at: String,
    /// Last modification
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_defaults_to_medium() {
        let json = r#"{
            "id": "i1",
            "list_id": "l1",
            "title": "Socks",
            "url": null,
            "price_cents": null,
            "image_url": null,
            "category": null,
            "notes": null,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.priority, Priority::Medium);
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"low\"");
    }
}
