// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Giftwell: shareable wishlists with anonymous item claims.
//!
//! This crate provides the backend API for creating wishlists, adding
//! items, sharing lists publicly, and letting anonymous visitors claim
//! items with a bearer secret token.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use middleware::rate_limit::RateLimiter;
use services::MetadataService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub metadata_service: MetadataService,
    /// Strict limiter for auth and anonymous claim endpoints.
    pub auth_limiter: RateLimiter,
    /// Relaxed limiter for the general API surface.
    pub api_limiter: RateLimiter,
}
