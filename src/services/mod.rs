// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod claims;
pub mod export;
pub mod metadata;
pub mod ownership;
pub mod tokens;

pub use metadata::{MetadataService, UrlMetadata};
