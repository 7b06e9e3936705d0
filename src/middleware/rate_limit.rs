// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process, per-instance rate limiting.
//!
//! A fixed-window counter per client key. The limiter is constructed at
//! startup and injected through `AppState`; it suspends nothing and
//! rejects over-budget requests synchronously with a Retry-After hint.
//! Limits are per process instance, not shared across deployments.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Drop stale windows once the map grows past this many keys.
const SWEEP_THRESHOLD: usize = 10_000;

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client identifier.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: DashMap::new(),
        }
    }

    /// Admit or reject a request for the given key.
    ///
    /// Returns `Err(retry_after_secs)` when the key is over budget for the
    /// current window.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        let now = Instant::now();

        if self.windows.len() > SWEEP_THRESHOLD {
            let window = self.window;
            self.windows
                .retain(|_, w| now.duration_since(w.started) < window);
        }

        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            let elapsed = now.duration_since(entry.started);
            let retry_after = self.window.saturating_sub(elapsed).as_secs().max(1);
            return Err(retry_after);
        }

        entry.count += 1;
        Ok(())
    }
}

/// Client key for rate limiting: real client IP from proxy headers.
fn client_key(headers: &HeaderMap) -> String {
    // X-Forwarded-For first (first IP in the chain), then X-Real-IP.
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        return ip.to_string();
    }

    if let Some(ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        return ip.to_string();
    }

    "unknown".to_string()
}

/// Strict limiter for auth and anonymous claim endpoints.
pub async fn limit_strict(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state.auth_limiter, request, next).await
}

/// Relaxed limiter for the general API surface.
pub async fn limit_general(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state.api_limiter, request, next).await
}

async fn enforce(
    limiter: &RateLimiter,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(request.headers());

    if let Err(retry_after_secs) = limiter.check(&key) {
        tracing::warn!(client = %key, retry_after_secs, "Rate limit exceeded");
        return Err(AppError::RateLimited { retry_after_secs });
    }

    Ok(next.run(request).await)
}
