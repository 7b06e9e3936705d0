//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const LISTS: &str = "lists";
    pub const ITEMS: &str = "items";
    /// Claims are keyed by item id to enforce at-most-one claim per item
    pub const CLAIMS: &str = "claims";
}
